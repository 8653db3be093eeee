use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use horn_core::model::{InquiryData, ModelError, Passenger, PassengerUpdate, TripUpdate};

/// The three wizard steps, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Step {
    TripDetails,
    PassengerInfo,
    Confirmation,
}

impl Step {
    pub fn ordinal(self) -> u8 {
        match self {
            Step::TripDetails => 1,
            Step::PassengerInfo => 2,
            Step::Confirmation => 3,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::TripDetails => "TripDetails",
            Step::PassengerInfo => "PassengerInfo",
            Step::Confirmation => "Confirmation",
        };
        write!(f, "{}", label)
    }
}

/// One visitor's progress through the inquiry form: current step plus the
/// working form data. Transitions are gated here rather than left to
/// whatever the caller's screens happen to reach.
#[derive(Debug, Clone)]
pub struct InquirySession {
    pub id: Uuid,
    pub step: Step,
    pub data: InquiryData,
}

impl InquirySession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::TripDetails,
            data: InquiryData::fresh(),
        }
    }

    /// TripDetails → PassengerInfo. The only forward move the visitor
    /// drives directly; the move into Confirmation belongs to submission.
    pub fn next(&mut self) -> Result<Step, WizardError> {
        match self.step {
            Step::TripDetails => {
                self.step = Step::PassengerInfo;
                Ok(self.step)
            }
            from => Err(WizardError::InvalidTransition {
                from,
                to: Step::PassengerInfo,
            }),
        }
    }

    /// PassengerInfo → TripDetails, form data untouched.
    pub fn back(&mut self) -> Result<Step, WizardError> {
        match self.step {
            Step::PassengerInfo => {
                self.step = Step::TripDetails;
                Ok(self.step)
            }
            from => Err(WizardError::InvalidTransition {
                from,
                to: Step::TripDetails,
            }),
        }
    }

    /// PassengerInfo → Confirmation. Called by the submission flow once
    /// the record has been persisted.
    pub fn confirm(&mut self) -> Result<Step, WizardError> {
        match self.step {
            Step::PassengerInfo => {
                self.step = Step::Confirmation;
                Ok(self.step)
            }
            from => Err(WizardError::InvalidTransition {
                from,
                to: Step::Confirmation,
            }),
        }
    }

    /// Confirmation → TripDetails with fresh default data, including a
    /// newly generated passenger id.
    pub fn restart(&mut self) -> Result<Step, WizardError> {
        match self.step {
            Step::Confirmation => {
                self.step = Step::TripDetails;
                self.data = InquiryData::fresh();
                Ok(self.step)
            }
            from => Err(WizardError::InvalidTransition {
                from,
                to: Step::TripDetails,
            }),
        }
    }

    /// Apply a trip-level patch. The form is locked once confirmed.
    pub fn update_trip(&mut self, update: TripUpdate) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.data.apply_trip_update(update)?;
        Ok(())
    }

    pub fn update_passenger(
        &mut self,
        passenger_id: &str,
        update: PassengerUpdate,
    ) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.data.apply_passenger_update(passenger_id, update)?;
        Ok(())
    }

    pub fn add_passenger(&mut self) -> Result<Passenger, WizardError> {
        self.ensure_editable()?;
        Ok(self.data.add_passenger().clone())
    }

    pub fn remove_passenger(&mut self, passenger_id: &str) -> Result<(), WizardError> {
        self.ensure_editable()?;
        self.data.remove_passenger(passenger_id)?;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), WizardError> {
        if self.step == Step::Confirmation {
            return Err(WizardError::Locked(self.step));
        }
        Ok(())
    }
}

impl Default for InquirySession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition { from: Step, to: Step },

    #[error("The inquiry can no longer be edited at the {0} step")]
    Locked(Step),

    #[error(transparent)]
    Model(#[from] ModelError),
}
