use crate::model::InquiryRecord;

/// Outcome of a reference/phone lookup over the stored records.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Nothing matched (including a blank query).
    NotFound,
    /// Exactly one match; callers auto-select it.
    Unique(InquiryRecord),
    /// Several matches, in stored order, for the caller to pick from.
    Multiple(Vec<InquiryRecord>),
}

/// Case-insensitive substring search against the record reference and
/// every passenger phone number. Phone formatting is not normalized, so
/// a query with spaces only matches records stored with the same spacing.
pub fn search_records(records: &[InquiryRecord], query: &str) -> SearchOutcome {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchOutcome::NotFound;
    }

    let mut matches: Vec<InquiryRecord> = records
        .iter()
        .filter(|record| record.matches(&query))
        .cloned()
        .collect();
    tracing::debug!(matches = matches.len(), "inquiry lookup finished");

    match matches.len() {
        0 => SearchOutcome::NotFound,
        1 => SearchOutcome::Unique(matches.remove(0)),
        _ => SearchOutcome::Multiple(matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InquiryData, InquiryRecord, PassengerUpdate, TripUpdate};

    fn record(origin: &str, phone: &str) -> InquiryRecord {
        let mut data = InquiryData::fresh();
        data.apply_trip_update(TripUpdate {
            origin: Some(origin.to_string()),
            ..Default::default()
        })
        .unwrap();
        let pid = data.passengers[0].id.clone();
        data.apply_passenger_update(
            &pid,
            PassengerUpdate {
                phone: Some(phone.to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        InquiryRecord::from_data(data)
    }

    #[test]
    fn test_search_by_reference_any_casing() {
        let records = vec![record("Melbourne", "0410111222")];
        let id = records[0].id.clone();

        match search_records(&records, &id.to_uppercase()) {
            SearchOutcome::Unique(found) => assert_eq!(found.id, id),
            other => panic!("expected unique match, got {:?}", other),
        }
        match search_records(&records, &id.to_lowercase()) {
            SearchOutcome::Unique(found) => assert_eq!(found.id, id),
            other => panic!("expected unique match, got {:?}", other),
        }
    }

    #[test]
    fn test_search_by_phone_substring() {
        let records = vec![
            record("Melbourne", "0410111222"),
            record("Sydney", "0410333444"),
        ];

        match search_records(&records, "333") {
            SearchOutcome::Unique(found) => assert_eq!(found.data.origin, "Sydney"),
            other => panic!("expected unique match, got {:?}", other),
        }
    }

    #[test]
    fn test_search_multiple_keeps_stored_order() {
        let records = vec![
            record("Melbourne", "0410111222"),
            record("Sydney", "0410111333"),
        ];

        match search_records(&records, "0410111") {
            SearchOutcome::Multiple(found) => {
                assert_eq!(found.len(), 2);
                assert_eq!(found[0].data.origin, "Melbourne");
                assert_eq!(found[1].data.origin, "Sydney");
            }
            other => panic!("expected multiple matches, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_and_missing_queries() {
        let records = vec![record("Melbourne", "0410111222")];
        assert_eq!(search_records(&records, "   "), SearchOutcome::NotFound);
        assert_eq!(
            search_records(&records, "no-such-ref"),
            SearchOutcome::NotFound
        );
    }
}
