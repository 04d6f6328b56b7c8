use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::community::place::PlaceId;

/// Identifies a person within a [`Community`](crate::community::Community). Ids are assigned in
/// creation order and never change, even when the population is shuffled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(pub(crate) usize);

impl PersonId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stages of infection. The order of the variants is significant: every status after
/// `Uninfected` counts as infected.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum InfectionStatus {
    Uninfected,
    Latent,
    Bedridden,
    Recovered,
    Dead,
}

impl InfectionStatus {
    #[must_use]
    pub fn is_infected(self) -> bool {
        self > InfectionStatus::Uninfected
    }
}

/// Whether a person works, and if so where. An employee's workplace is assigned once, after
/// every home exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Employment {
    Unemployed,
    Employee { workplace: Option<PlaceId> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    id: PersonId,
    home: PlaceId,
    infection_status: InfectionStatus,
    employment: Employment,
}

impl Person {
    pub(crate) fn new(id: PersonId, home: PlaceId, employed: bool) -> Person {
        let employment = if employed {
            Employment::Employee { workplace: None }
        } else {
            Employment::Unemployed
        };
        Person {
            id,
            home,
            infection_status: InfectionStatus::Uninfected,
            employment,
        }
    }

    #[must_use]
    pub fn id(&self) -> PersonId {
        self.id
    }

    #[must_use]
    pub fn home(&self) -> PlaceId {
        self.home
    }

    #[must_use]
    pub fn infection_status(&self) -> InfectionStatus {
        self.infection_status
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infection_status.is_infected()
    }

    #[must_use]
    pub fn employment(&self) -> Employment {
        self.employment
    }

    #[must_use]
    pub fn is_employee(&self) -> bool {
        matches!(self.employment, Employment::Employee { .. })
    }

    #[must_use]
    pub fn workplace(&self) -> Option<PlaceId> {
        match self.employment {
            Employment::Employee { workplace } => workplace,
            Employment::Unemployed => None,
        }
    }

    /// Moves an uninfected person to `Latent`. Returns whether the status changed; a person who
    /// is already infected keeps their current status.
    pub fn infect(&mut self) -> bool {
        if self.is_infected() {
            return false;
        }
        self.infection_status = InfectionStatus::Latent;
        true
    }

    /// # Panics
    ///
    /// Panics if this person is not an employee or already has a workplace. In either case the
    /// person is left unchanged.
    pub(crate) fn set_workplace(&mut self, place: PlaceId) {
        match &mut self.employment {
            Employment::Unemployed => panic!("Person {} is not an employee", self.id),
            Employment::Employee { workplace } => {
                if let Some(current) = workplace {
                    panic!(
                        "Person {} already works at Workplace {current}",
                        self.id
                    );
                }
                *workplace = Some(place);
            }
        }
    }
}

/// Renders as the person's name, home, status and, for employees, workplace:
/// `Person 4 Home 1 Latent Workplace 9`.
impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Person {} Home {} {}",
            self.id, self.home, self.infection_status
        )?;
        if let Some(workplace) = self.workplace() {
            write!(f, " Workplace {workplace}")?;
        }
        Ok(())
    }
}
