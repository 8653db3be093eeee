use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pii;
use crate::reference;

/// Nationality pre-filled on a fresh passenger form.
pub const DEFAULT_NATIONALITY: &str = "Australia";

/// Stopover duration pre-filled on a fresh inquiry.
pub const DEFAULT_STOPOVER_DURATION: &str = "2 Days";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    RoundTrip,
    OneWay,
}

impl TripType {
    /// Wire form of the trip type, as stored in records and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::RoundTrip => "round-trip",
            TripType::OneWay => "one-way",
        }
    }
}

impl Default for TripType {
    // Older records were written before the one-way option existed.
    fn default() -> Self {
        TripType::RoundTrip
    }
}

/// A traveler on an inquiry. Dates are kept as the form's `YYYY-MM-DD`
/// strings (possibly empty) so that records written by any historical
/// frontend variant still round-trip through storage.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub passport_number: String,
    pub expiry_date: String,
    pub nationality: String,
    /// Base64 data URI of the scanned passport page, if uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_photo: Option<String>,
}

impl Passenger {
    /// Fresh blank passenger, seeded the way the form seeds one.
    pub fn blank() -> Self {
        Self {
            id: reference::passenger_id(),
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            dob: String::new(),
            passport_number: String::new(),
            expiry_date: String::new(),
            nationality: DEFAULT_NATIONALITY.to_string(),
            passport_photo: None,
        }
    }
}

// Passport number and photo must not leak into logs.
impl fmt::Debug for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Passenger")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("dob", &self.dob)
            .field("passport_number", &pii::mask_tail(&self.passport_number, 3))
            .field("expiry_date", &self.expiry_date)
            .field("nationality", &self.nationality)
            .field(
                "passport_photo",
                &self.passport_photo.as_ref().map(|_| "<attached>"),
            )
            .finish()
    }
}

/// The working form data gathered across the wizard steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryData {
    #[serde(default)]
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: String,
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
    pub need_stopover: bool,
    pub stopover_location: String,
    pub stopover_duration: String,
    pub special_requests: String,
    #[serde(default)]
    pub agent_code: String,
    pub passengers: Vec<Passenger>,
}

impl InquiryData {
    /// Defaults for a brand-new inquiry: one blank passenger, one adult.
    pub fn fresh() -> Self {
        Self {
            trip_type: TripType::RoundTrip,
            origin: String::new(),
            destination: String::new(),
            departure_date: String::new(),
            return_date: String::new(),
            adults: 1,
            children: 0,
            infants: 0,
            need_stopover: false,
            stopover_location: String::new(),
            stopover_duration: DEFAULT_STOPOVER_DURATION.to_string(),
            special_requests: String::new(),
            agent_code: String::new(),
            passengers: vec![Passenger::blank()],
        }
    }

    /// Apply a trip-level patch. Counts are validated before anything is
    /// written, so a rejected patch leaves the data untouched.
    pub fn apply_trip_update(&mut self, update: TripUpdate) -> Result<(), ModelError> {
        if update.adults == Some(0) {
            return Err(ModelError::NoAdults);
        }

        if let Some(trip_type) = update.trip_type {
            self.trip_type = trip_type;
        }
        if let Some(origin) = update.origin {
            self.origin = origin;
        }
        if let Some(destination) = update.destination {
            self.destination = destination;
        }
        if let Some(departure_date) = update.departure_date {
            self.departure_date = departure_date;
        }
        if let Some(return_date) = update.return_date {
            self.return_date = return_date;
        }
        if let Some(adults) = update.adults {
            self.adults = adults;
        }
        if let Some(children) = update.children {
            self.children = children;
        }
        if let Some(infants) = update.infants {
            self.infants = infants;
        }
        if let Some(need_stopover) = update.need_stopover {
            self.need_stopover = need_stopover;
        }
        if let Some(stopover_location) = update.stopover_location {
            self.stopover_location = stopover_location;
        }
        if let Some(stopover_duration) = update.stopover_duration {
            self.stopover_duration = stopover_duration;
        }
        if let Some(special_requests) = update.special_requests {
            self.special_requests = special_requests;
        }
        if let Some(agent_code) = update.agent_code {
            self.agent_code = agent_code;
        }
        Ok(())
    }

    /// Apply a per-passenger patch, addressed by passenger id.
    pub fn apply_passenger_update(
        &mut self,
        passenger_id: &str,
        update: PassengerUpdate,
    ) -> Result<(), ModelError> {
        let passenger = self
            .passengers
            .iter_mut()
            .find(|p| p.id == passenger_id)
            .ok_or_else(|| ModelError::PassengerNotFound(passenger_id.to_string()))?;

        if let Some(full_name) = update.full_name {
            passenger.full_name = full_name;
        }
        if let Some(email) = update.email {
            passenger.email = email;
        }
        if let Some(phone) = update.phone {
            passenger.phone = phone;
        }
        if let Some(dob) = update.dob {
            passenger.dob = dob;
        }
        if let Some(passport_number) = update.passport_number {
            passenger.passport_number = passport_number;
        }
        if let Some(expiry_date) = update.expiry_date {
            passenger.expiry_date = expiry_date;
        }
        if let Some(nationality) = update.nationality {
            passenger.nationality = nationality;
        }
        if let Some(passport_photo) = update.passport_photo {
            passenger.passport_photo = passport_photo;
        }
        Ok(())
    }

    /// Append a blank passenger and return a reference to it.
    pub fn add_passenger(&mut self) -> &Passenger {
        self.passengers.push(Passenger::blank());
        self.passengers
            .last()
            .expect("passenger was just pushed")
    }

    /// Remove a passenger by id. An inquiry always keeps at least one.
    pub fn remove_passenger(&mut self, passenger_id: &str) -> Result<(), ModelError> {
        if self.passengers.len() <= 1 {
            return Err(ModelError::LastPassenger);
        }
        let before = self.passengers.len();
        self.passengers.retain(|p| p.id != passenger_id);
        if self.passengers.len() == before {
            return Err(ModelError::PassengerNotFound(passenger_id.to_string()));
        }
        Ok(())
    }
}

/// Trip-level patch. Absent fields are left as they are.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TripUpdate {
    pub trip_type: Option<TripType>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub infants: Option<u32>,
    pub need_stopover: Option<bool>,
    pub stopover_location: Option<String>,
    pub stopover_duration: Option<String>,
    pub special_requests: Option<String>,
    pub agent_code: Option<String>,
}

/// Per-passenger patch. `passport_photo` takes `Some(None)` to clear an
/// uploaded photo.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassengerUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub passport_number: Option<String>,
    pub expiry_date: Option<String>,
    pub nationality: Option<String>,
    #[serde(deserialize_with = "deserialize_double_option")]
    pub passport_photo: Option<Option<String>>,
}

fn deserialize_double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InquiryStatus {
    New,
    Contacted,
    Closed,
}

impl Default for InquiryStatus {
    // Records written before the status column existed read back as New.
    fn default() -> Self {
        InquiryStatus::New
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InquiryStatus::New => "New",
            InquiryStatus::Contacted => "Contacted",
            InquiryStatus::Closed => "Closed",
        };
        write!(f, "{}", label)
    }
}

impl InquiryStatus {
    /// Lifecycle: New → Contacted → Closed, with New → Closed allowed for
    /// inquiries abandoned before anyone reached out. Closed is terminal
    /// and nothing moves backwards.
    pub fn transition(self, to: InquiryStatus) -> Result<InquiryStatus, ModelError> {
        use InquiryStatus::*;
        match (self, to) {
            (New, Contacted) | (New, Closed) | (Contacted, Closed) => Ok(to),
            _ => Err(ModelError::InvalidStatusTransition {
                from: self.to_string(),
                to: to.to_string(),
            }),
        }
    }
}

/// A submitted inquiry as it sits in the store. The trip fields are
/// flattened so the on-disk JSON matches the records the legacy web form
/// wrote, which keeps old backups importable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRecord {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub status: InquiryStatus,
    #[serde(flatten)]
    pub data: InquiryData,
}

impl InquiryRecord {
    /// Stamp working form data into a stored record: generated reference,
    /// submission timestamp, status New.
    pub fn from_data(data: InquiryData) -> Self {
        Self {
            id: reference::inquiry_reference(),
            submitted_at: Utc::now(),
            status: InquiryStatus::New,
            data,
        }
    }

    /// Case-insensitive match against the reference or any passenger phone.
    /// `query` must already be lowercased.
    pub fn matches(&self, query: &str) -> bool {
        self.id.to_lowercase().contains(query)
            || self
                .data
                .passengers
                .iter()
                .any(|p| p.phone.to_lowercase().contains(query))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("At least one adult traveler is required")]
    NoAdults,

    #[error("Passenger not found: {0}")]
    PassengerNotFound(String),

    #[error("An inquiry must keep at least one passenger")]
    LastPassenger,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },
}
