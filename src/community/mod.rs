//! The synthetic community: every person, home and workplace that exists during a run.
//!
//! A [`Community`] owns people and places in the order they were created. People refer to their
//! home and workplace by id, and places refer back to their occupants by id, so the one
//! reordering the population allows ([`Community::shuffle_people`]) only changes the order in
//! which people are visited, never who lives or works where.
//!
//! Within a simulation the community is held by the `Context` and accessed through
//! [`ContextCommunityExt`].
mod person;
mod place;
mod synthesis;
pub mod workplace;

use std::fmt;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

pub use person::{Employment, InfectionStatus, Person, PersonId};
pub use place::{Place, PlaceId, PlaceKind};
pub use synthesis::SizeDistribution;

use crate::context::Context;
use crate::parameters::CommunityParameters;
use crate::random::ContextRandomExt;
use crate::{define_data_plugin, define_rng};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Community {
    /// Indexed by `PersonId`.
    people: Vec<Person>,
    /// The order in which `people()` visits the population.
    order: Vec<PersonId>,
    /// Indexed by `PlaceId`.
    places: Vec<Place>,
    shuffled: bool,
}

/// Headline counts for a community.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommunitySummary {
    pub people: usize,
    pub employees: usize,
    pub infected: usize,
    pub homes: usize,
    pub workplaces: usize,
}

impl fmt::Display for CommunitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} people ({} employed, {} infected) in {} homes and {} workplaces",
            self.people, self.employees, self.infected, self.homes, self.workplaces
        )
    }
}

impl Community {
    #[must_use]
    pub fn new() -> Community {
        Community::default()
    }

    /// Adds an empty home sized for `capacity` residents.
    pub fn add_home(&mut self, capacity: usize) -> PlaceId {
        let id = PlaceId(self.places.len());
        self.places.push(Place::new_home(id, capacity));
        id
    }

    /// Adds an empty workplace sized for `capacity` employees.
    pub fn add_workplace(&mut self, capacity: usize) -> PlaceId {
        let id = PlaceId(self.places.len());
        self.places.push(Place::new_workplace(id, capacity));
        id
    }

    /// Adds a person living at `home`. Employees start without a workplace.
    ///
    /// # Panics
    ///
    /// Panics if `home` is not a home in this community.
    pub fn add_person(&mut self, home: PlaceId, employed: bool) -> PersonId {
        let id = PersonId(self.people.len());
        self.places[home.0].add_resident(id);
        self.people.push(Person::new(id, home, employed));
        self.order.push(id);
        id
    }

    /// Assigns `person` to `workplace`.
    ///
    /// # Panics
    ///
    /// Panics if `person` is not an employee, already has a workplace, or if `workplace` is not a
    /// workplace. Nothing is modified when this panics.
    pub fn assign_workplace(&mut self, person: PersonId, workplace: PlaceId) {
        let place = &self.places[workplace.0];
        assert!(place.is_workplace(), "{} is not a workplace", place.name());
        self.people[person.0].set_workplace(workplace);
        self.places[workplace.0].add_employee(person);
    }

    /// Infects `person`. Returns whether their status changed.
    pub fn infect(&mut self, person: PersonId) -> bool {
        self.people[person.0].infect()
    }

    /// Randomly permutes the order in which `people()` visits the population.
    ///
    /// # Panics
    ///
    /// The population may only be shuffled once.
    pub fn shuffle_people<R: Rng>(&mut self, rng: &mut R) {
        assert!(!self.shuffled, "The population has already been shuffled");
        self.order.shuffle(rng);
        self.shuffled = true;
    }

    /// All people, in creation order until the population has been shuffled.
    pub fn people(&self) -> impl Iterator<Item = &Person> + '_ {
        self.order.iter().map(|id| &self.people[id.0])
    }

    /// All places, in creation order.
    pub fn places(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter()
    }

    pub fn homes(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter().filter(|place| place.is_home())
    }

    pub fn workplaces(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter().filter(|place| place.is_workplace())
    }

    #[must_use]
    pub fn get_person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(id.0)
    }

    #[must_use]
    pub fn get_place(&self, id: PlaceId) -> Option<&Place> {
        self.places.get(id.0)
    }

    #[must_use]
    pub fn population(&self) -> usize {
        self.people.len()
    }

    #[must_use]
    pub fn summary(&self) -> CommunitySummary {
        CommunitySummary {
            people: self.people.len(),
            employees: self.people.iter().filter(|p| p.is_employee()).count(),
            infected: self.people.iter().filter(|p| p.is_infected()).count(),
            homes: self.homes().count(),
            workplaces: self.workplaces().count(),
        }
    }
}

define_rng!(CommunityRng);

define_data_plugin!(CommunityPlugin, Option<Community>, None);

pub trait ContextCommunityExt {
    /// Builds the community described by `parameters` using the context's random numbers, stores
    /// it in the context and schedules the first opening of every workplace.
    ///
    /// # Panics
    ///
    /// Panics if a community has already been synthesized in this context, or if `init_random`
    /// has not been called.
    fn synthesize_community(&mut self, parameters: &CommunityParameters);

    /// The community built by `synthesize_community`, if any.
    fn get_community(&self) -> Option<&Community>;
}

impl ContextCommunityExt for Context {
    fn synthesize_community(&mut self, parameters: &CommunityParameters) {
        assert!(
            self.get_community().is_none(),
            "A community has already been synthesized"
        );
        debug!("synthesizing community from {parameters:?}");
        let community = self.sample(CommunityRng, |rng| Community::synthesize(parameters, rng));
        info!("synthesized community: {}", community.summary());

        let workplaces: Vec<PlaceId> = community.workplaces().map(Place::id).collect();
        *self.get_data_container_mut(CommunityPlugin) = Some(community);
        for workplace in workplaces {
            workplace::schedule_opening(self, workplace);
        }
    }

    fn get_community(&self) -> Option<&Community> {
        self.get_data_container(CommunityPlugin)
            .and_then(Option::as_ref)
    }
}
