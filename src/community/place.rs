use std::fmt;

use serde::{Deserialize, Serialize};

use crate::community::person::PersonId;

/// Identifies a home or workplace within a [`Community`](crate::community::Community).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlaceId(pub(crate) usize);

impl PlaceId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a place is used for, together with the people who use it, in the order they were added.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaceKind {
    Home { residents: Vec<PersonId> },
    Work { employees: Vec<PersonId> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    id: PlaceId,
    capacity: usize,
    kind: PlaceKind,
}

impl Place {
    pub(crate) fn new_home(id: PlaceId, capacity: usize) -> Place {
        Place {
            id,
            capacity,
            kind: PlaceKind::Home {
                residents: Vec::new(),
            },
        }
    }

    pub(crate) fn new_workplace(id: PlaceId, capacity: usize) -> Place {
        Place {
            id,
            capacity,
            kind: PlaceKind::Work {
                employees: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn id(&self) -> PlaceId {
        self.id
    }

    /// The number of people this place was sized for when it was created.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn kind(&self) -> &PlaceKind {
        &self.kind
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        matches!(self.kind, PlaceKind::Home { .. })
    }

    #[must_use]
    pub fn is_workplace(&self) -> bool {
        matches!(self.kind, PlaceKind::Work { .. })
    }

    /// Residents of a home or employees of a workplace.
    #[must_use]
    pub fn occupants(&self) -> &[PersonId] {
        match &self.kind {
            PlaceKind::Home { residents } => residents,
            PlaceKind::Work { employees } => employees,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self.kind {
            PlaceKind::Home { .. } => format!("Home {}", self.id),
            PlaceKind::Work { .. } => format!("Workplace {}", self.id),
        }
    }

    pub(crate) fn add_resident(&mut self, person: PersonId) {
        match &mut self.kind {
            PlaceKind::Home { residents } => residents.push(person),
            PlaceKind::Work { .. } => panic!("{} is not a home", self.name()),
        }
    }

    pub(crate) fn add_employee(&mut self, person: PersonId) {
        match &mut self.kind {
            PlaceKind::Work { employees } => employees.push(person),
            PlaceKind::Home { .. } => panic!("{} is not a workplace", self.name()),
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        for person in self.occupants() {
            write!(f, " Person {person}")?;
        }
        Ok(())
    }
}
