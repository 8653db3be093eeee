use horn_core::model::InquiryRecord;

/// Column order of the CSV lead export. Kept stable so spreadsheets built
/// on previous exports keep lining up.
const CSV_HEADERS: [&str; 11] = [
    "ID",
    "Date",
    "Type",
    "Origin",
    "Destination",
    "Departure",
    "Return",
    "Adults",
    "Children",
    "Agent Code",
    "Passengers",
];

/// Full-fidelity JSON backup of the stored list, indented for humans.
pub fn export_json(records: &[InquiryRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Flat CSV of the lead list. Passenger names are joined with "; " into a
/// single column. Field values are emitted as-is, without quote escaping,
/// matching the format downstream spreadsheets already ingest.
pub fn export_csv(records: &[InquiryRecord]) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];

    for record in records {
        let passengers = record
            .data
            .passengers
            .iter()
            .map(|p| p.full_name.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let row = [
            record.id.clone(),
            record.submitted_at.format("%d/%m/%Y").to_string(),
            record.data.trip_type.as_str().to_string(),
            record.data.origin.clone(),
            record.data.destination.clone(),
            record.data.departure_date.clone(),
            record.data.return_date.clone(),
            record.data.adults.to_string(),
            record.data.children.to_string(),
            record.data.agent_code.clone(),
            passengers,
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Parse an uploaded backup. The top-level value must be a JSON array;
/// anything else is rejected before the store is touched.
pub fn parse_backup(content: &str) -> Result<Vec<InquiryRecord>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if !value.is_array() {
        return Err(ImportError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Backup file is not valid inquiry data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Backup file must contain a top-level array of inquiry records")]
    NotAnArray,
}
