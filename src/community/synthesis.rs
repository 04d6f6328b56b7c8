//! Builds a community from aggregate parameters.
//!
//! Homes and workplaces are created on demand: the current place is filled until its capacity is
//! used up, and only then is the next one created with a freshly drawn capacity. Capacities follow
//! a log-normal distribution described by a median and a "scatter".
//!
//! The initially infected people are chosen in the same pass that creates the population. Person
//! `i` of `n` is infected with probability `remaining / (n - i)`, which selects exactly
//! `initial_infected` people, each with the same probability, without knowing anything about the
//! people still to come.
use log::trace;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::community::{Community, PersonId, PlaceId};
use crate::parameters::CommunityParameters;

/// Log-normal distribution of household or workplace sizes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SizeDistribution {
    median: f64,
    sigma: f64,
}

impl SizeDistribution {
    /// `median` must be at least one and `scatter` non-negative.
    #[must_use]
    pub fn new(median: f64, scatter: f64) -> SizeDistribution {
        SizeDistribution {
            median,
            sigma: ((scatter + median) / median).ln(),
        }
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.median
    }

    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Draws a size, never less than one.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let z: f64 = rng.sample(StandardNormal);
        ((self.sigma * z).exp() * self.median).ceil().max(1.0) as usize
    }
}

/// The place currently being filled and how many more people fit in it.
struct Allotment {
    place: PlaceId,
    remaining: usize,
}

/// Returns the place the next person goes to, calling `open` for a new place when the current
/// one is full.
fn allot(current: &mut Option<Allotment>, open: impl FnOnce() -> Allotment) -> PlaceId {
    if matches!(current, Some(allotment) if allotment.remaining == 0) {
        *current = None;
    }
    let allotment = current.get_or_insert_with(open);
    allotment.remaining -= 1;
    allotment.place
}

impl Community {
    /// Builds a community that matches `parameters`, drawing every random number from `rng`.
    ///
    /// `parameters` are assumed to be valid (see [`CommunityParameters::validate`]).
    pub fn synthesize<R: Rng>(parameters: &CommunityParameters, rng: &mut R) -> Community {
        let household_sizes =
            SizeDistribution::new(parameters.household_median, parameters.household_scatter);
        let workplace_sizes =
            SizeDistribution::new(parameters.workplace_median, parameters.workplace_scatter);
        let population = parameters.population;

        let mut community = Community::new();
        let mut home: Option<Allotment> = None;
        let mut remaining_infections = parameters.initial_infected;

        for i in 0..population {
            let place = allot(&mut home, || {
                let capacity = household_sizes.sample(rng);
                let place = community.add_home(capacity);
                trace!("created Home {place} for {capacity} residents");
                Allotment {
                    place,
                    remaining: capacity,
                }
            });

            let employed = rng.random_bool(parameters.employment_probability);
            let person = community.add_person(place, employed);

            // `remaining_infections` never exceeds `population - i`, the number of people
            // not yet considered.
            if rng.random_range(0..population - i) < remaining_infections {
                community.infect(person);
                remaining_infections -= 1;
            }
        }
        debug_assert_eq!(remaining_infections, 0);

        // Break the correlation between creation order (and so household) and workplace.
        community.shuffle_people(rng);

        let employees: Vec<PersonId> = community
            .people()
            .filter(|person| person.is_employee())
            .map(|person| person.id())
            .collect();
        let mut work: Option<Allotment> = None;
        for employee in employees {
            let place = allot(&mut work, || {
                let capacity = workplace_sizes.sample(rng);
                let place = community.add_workplace(capacity);
                trace!("created Workplace {place} for {capacity} employees");
                Allotment {
                    place,
                    remaining: capacity,
                }
            });
            community.assign_workplace(employee, place);
        }

        community
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::{InfectionStatus, Person};
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn parameters(population: usize, initial_infected: usize) -> CommunityParameters {
        CommunityParameters {
            population,
            household_median: 3.0,
            household_scatter: 2.0,
            workplace_median: 10.0,
            workplace_scatter: 20.0,
            employment_probability: 0.7,
            initial_infected,
            end_time: 10.0,
        }
    }

    fn synthesize(parameters: &CommunityParameters, seed: u64) -> Community {
        let mut rng = SmallRng::seed_from_u64(seed);
        Community::synthesize(parameters, &mut rng)
    }

    fn infected(community: &Community) -> usize {
        community
            .people()
            .filter(|person| person.infection_status() != InfectionStatus::Uninfected)
            .count()
    }

    #[test]
    fn size_distribution_sigma() {
        let sizes = SizeDistribution::new(2.0, 2.0);
        assert_approx_eq!(sizes.sigma(), 2.0_f64.ln());
        assert_approx_eq!(sizes.median(), 2.0);
        assert_approx_eq!(SizeDistribution::new(4.0, 0.0).sigma(), 0.0);
    }

    #[test]
    fn size_without_scatter_is_median() {
        let mut rng = SmallRng::seed_from_u64(1);
        let sizes = SizeDistribution::new(3.5, 0.0);
        for _ in 0..100 {
            assert_eq!(sizes.sample(&mut rng), 4);
        }
    }

    #[test]
    fn sizes_are_at_least_one() {
        let mut rng = SmallRng::seed_from_u64(1);
        let sizes = SizeDistribution::new(1.0, 1.0e6);
        for _ in 0..1000 {
            assert!(sizes.sample(&mut rng) >= 1);
        }
    }

    #[test]
    fn allot_opens_places_on_demand() {
        let mut next = 0;
        let mut current = None;
        let mut places = Vec::new();
        for _ in 0..5 {
            places.push(allot(&mut current, || {
                next += 1;
                Allotment {
                    place: PlaceId(next),
                    remaining: 2,
                }
            }));
        }
        assert_eq!(
            places,
            vec![PlaceId(1), PlaceId(1), PlaceId(2), PlaceId(2), PlaceId(3)]
        );
    }

    #[test]
    fn every_person_has_one_home() {
        let community = synthesize(&parameters(500, 20), 42);
        assert_eq!(community.population(), 500);

        let mut residents = 0;
        for home in community.homes() {
            assert!(!home.occupants().is_empty());
            for id in home.occupants() {
                let person = community.get_person(*id).unwrap();
                assert_eq!(person.home(), home.id());
            }
            residents += home.occupants().len();
        }
        assert_eq!(residents, 500);
    }

    #[test]
    fn household_capacity_is_consumed_in_order() {
        let community = synthesize(&parameters(500, 20), 42);
        let homes: Vec<_> = community.homes().collect();
        let (last, full) = homes.split_last().unwrap();
        for home in full {
            assert_eq!(home.occupants().len(), home.capacity());
        }
        assert!(last.occupants().len() <= last.capacity());
    }

    #[test]
    fn exact_number_infected() {
        for seed in 0..20 {
            let community = synthesize(&parameters(10, 3), seed);
            assert_eq!(infected(&community), 3);
            assert!(community
                .people()
                .filter(|person| person.is_infected())
                .all(|person| person.infection_status() == InfectionStatus::Latent));
        }
    }

    #[test]
    fn no_one_infected() {
        let community = synthesize(&parameters(200, 0), 7);
        assert_eq!(infected(&community), 0);
    }

    #[test]
    fn everyone_infected() {
        let community = synthesize(&parameters(200, 200), 7);
        assert_eq!(infected(&community), 200);
    }

    #[test]
    fn single_person() {
        let mut single = parameters(1, 1);
        single.employment_probability = 1.0;
        let community = synthesize(&single, 3);
        assert_eq!(community.population(), 1);
        assert_eq!(community.homes().count(), 1);
        assert_eq!(community.workplaces().count(), 1);
        assert_eq!(infected(&community), 1);
    }

    #[test]
    fn employees_have_one_workplace() {
        let community = synthesize(&parameters(500, 20), 9);
        let mut employees = 0;
        for person in community.people() {
            match person.workplace() {
                Some(workplace) => {
                    assert!(person.is_employee());
                    let place = community.get_place(workplace).unwrap();
                    assert!(place.occupants().contains(&person.id()));
                    employees += 1;
                }
                None => assert!(!person.is_employee()),
            }
        }
        let packed: usize = community
            .workplaces()
            .map(|place| place.occupants().len())
            .sum();
        assert_eq!(packed, employees);
    }

    #[test]
    fn nobody_employed() {
        let mut unemployed = parameters(100, 5);
        unemployed.employment_probability = 0.0;
        let community = synthesize(&unemployed, 1);
        assert_eq!(community.workplaces().count(), 0);
        assert!(community.people().all(|person| !person.is_employee()));
    }

    #[test]
    fn everybody_employed() {
        let mut employed = parameters(100, 5);
        employed.employment_probability = 1.0;
        let community = synthesize(&employed, 1);
        assert!(community.people().all(|person| person.workplace().is_some()));
    }

    #[test]
    fn workplaces_are_not_filled_in_household_order() {
        let mut employed = parameters(300, 0);
        employed.employment_probability = 1.0;
        let community = synthesize(&employed, 5);
        let order: Vec<PersonId> = community.people().map(Person::id).collect();
        assert!(order.windows(2).any(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn same_seed_same_community() {
        let first = synthesize(&parameters(300, 30), 123);
        let second = synthesize(&parameters(300, 30), 123);
        assert_eq!(first, second);

        let third = synthesize(&parameters(300, 30), 124);
        assert_ne!(first, third);
    }
}
