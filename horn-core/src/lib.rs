pub mod model;
pub mod pii;
pub mod reference;
pub mod repository;
pub mod search;

pub use model::{
    InquiryData, InquiryRecord, InquiryStatus, ModelError, Passenger, PassengerUpdate, TripType,
    TripUpdate,
};
pub use repository::{InquiryRepository, StoreError};
pub use search::{search_records, SearchOutcome};
