use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::PatientError;
use crate::models::{Gender, NewPatient};

/// Redraws allowed per record in a batch before the pools are declared too small.
const MAX_REDRAWS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePools {
    pub male_first_names: Vec<String>,
    pub female_first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub cities: Vec<String>,
    pub email_domain: String,
}

impl Default for ReferencePools {
    fn default() -> Self {
        Self {
            male_first_names: owned(&["Rahul", "Amit", "Rohit", "Vikas", "Anil", "Suresh"]),
            female_first_names: owned(&["Anita", "Sunita", "Priya", "Neha", "Pooja"]),
            last_names: owned(&["Sharma", "Verma", "Singh", "Gupta", "Patel"]),
            cities: owned(&["Delhi", "Mumbai", "Chennai", "Bangalore", "Pune"]),
            email_domain: "@gmail.com".to_string(),
        }
    }
}

impl ReferencePools {
    pub fn with_first_names(male: &[&str], female: &[&str]) -> Self {
        Self {
            male_first_names: owned(male),
            female_first_names: owned(female),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PatientError> {
        let pools = [
            ("male_first_names", &self.male_first_names),
            ("female_first_names", &self.female_first_names),
            ("last_names", &self.last_names),
            ("cities", &self.cities),
        ];

        for (name, pool) in pools {
            if pool.is_empty() {
                return Err(PatientError::EmptyPool(name));
            }
        }

        Ok(())
    }

    fn first_names(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male_first_names,
            Gender::Female => &self.female_first_names,
        }
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Closed interval of admissible birth dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl BirthDateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PatientError> {
        if start > end {
            return Err(PatientError::InvalidBirthDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 1960-01-01 through 2010-12-31.
    pub fn standard() -> Result<Self, PatientError> {
        let start = NaiveDate::from_ymd_opt(1960, 1, 1)
            .ok_or_else(|| PatientError::InvalidRecord("bad start date".to_string()))?;
        let end = NaiveDate::from_ymd_opt(2010, 12, 31)
            .ok_or_else(|| PatientError::InvalidRecord("bad end date".to_string()))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Draws plausible-but-fake patients from the reference pools. All randomness comes
/// from the injected `rng`, so a seeded generator replays the same sequence.
#[derive(Debug)]
pub struct PatientGenerator<R> {
    rng: R,
    pools: ReferencePools,
    birth_dates: BirthDateRange,
}

impl PatientGenerator<StdRng> {
    pub fn seeded(seed: u64, pools: ReferencePools) -> Result<Self, PatientError> {
        Self::with_rng(StdRng::seed_from_u64(seed), pools)
    }

    pub fn from_entropy(pools: ReferencePools) -> Result<Self, PatientError> {
        Self::with_rng(StdRng::from_entropy(), pools)
    }
}

impl<R: Rng> PatientGenerator<R> {
    pub fn with_rng(rng: R, pools: ReferencePools) -> Result<Self, PatientError> {
        pools.validate()?;
        Ok(Self {
            rng,
            pools,
            birth_dates: BirthDateRange::standard()?,
        })
    }

    pub fn birth_dates(&self) -> BirthDateRange {
        self.birth_dates
    }

    /// One independent draw. Nothing is checked for uniqueness here.
    pub fn next_patient(&mut self) -> NewPatient {
        let gender = Gender::ALL[self.rng.gen_range(0..Gender::ALL.len())];
        let first_name = pick(&mut self.rng, self.pools.first_names(gender)).to_string();
        let last_name = pick(&mut self.rng, &self.pools.last_names).to_string();

        let offset = self.rng.gen_range(0..=self.birth_dates.span_days());
        let date_of_birth = self.birth_dates.start + Duration::days(offset);

        let address = pick(&mut self.rng, &self.pools.cities).to_string();
        let phone_number = format!("9{}", self.rng.gen_range(100_000_000u32..=999_999_999));
        let email = format!(
            "{}{}{}",
            first_name.to_lowercase(),
            self.rng.gen_range(1000u16..=9999),
            self.pools.email_domain
        );

        NewPatient {
            name: format!("{} {}", first_name, last_name),
            date_of_birth,
            gender,
            address,
            phone_number,
            email,
        }
    }

    /// Draws `count` records, redrawing any record whose phone number or email already
    /// occurred earlier in this batch. The target table is never consulted.
    ///
    /// Rejected draws are discarded whole, so the batch is not strictly uniform per
    /// field: combinations that collide often (short first names, crowded email
    /// suffixes) end up slightly under-represented compared to `next_patient`.
    pub fn generate_batch(&mut self, count: usize) -> Result<Vec<NewPatient>, PatientError> {
        let mut phones = HashSet::with_capacity(count);
        let mut emails = HashSet::with_capacity(count);
        let mut batch = Vec::with_capacity(count);
        let mut redraws = 0usize;

        while batch.len() < count {
            let mut accepted = false;

            for _ in 0..MAX_REDRAWS {
                let candidate = self.next_patient();
                if phones.contains(&candidate.phone_number) || emails.contains(&candidate.email) {
                    redraws += 1;
                    continue;
                }

                phones.insert(candidate.phone_number.clone());
                emails.insert(candidate.email.clone());
                batch.push(candidate);
                accepted = true;
                break;
            }

            if !accepted {
                return Err(PatientError::ContactSpaceExhausted {
                    requested: count,
                    generated: batch.len(),
                });
            }
        }

        debug!("Generated {} patients ({} redraws)", batch.len(), redraws);
        Ok(batch)
    }
}

fn pick<'p, R: Rng>(rng: &mut R, pool: &'p [String]) -> &'p str {
    &pool[rng.gen_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn scenario_generator(seed: u64) -> PatientGenerator<StdRng> {
        PatientGenerator::seeded(
            seed,
            ReferencePools::with_first_names(&["Rahul", "Amit"], &["Anita", "Sunita"]),
        )
        .unwrap()
    }

    #[test]
    fn test_same_seed_replays_same_sequence() {
        let first: Vec<NewPatient> = {
            let mut generator = scenario_generator(42);
            (0..5).map(|_| generator.next_patient()).collect()
        };
        let second: Vec<NewPatient> = {
            let mut generator = scenario_generator(42);
            (0..5).map(|_| generator.next_patient()).collect()
        };

        assert_eq!(first, second);
        for patient in &first {
            let expected_pool: &[&str] = match patient.gender {
                Gender::Male => &["Rahul", "Amit"],
                Gender::Female => &["Anita", "Sunita"],
            };
            assert!(expected_pool.contains(&patient.first_name()), "{}", patient.name);
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = scenario_generator(42);
        let mut b = scenario_generator(43);

        let a: Vec<NewPatient> = (0..20).map(|_| a.next_patient()).collect();
        let b: Vec<NewPatient> = (0..20).map(|_| b.next_patient()).collect();

        assert_ne!(a, b);
    }

    #[test]
    fn test_birth_dates_stay_in_range() {
        let mut generator = PatientGenerator::seeded(7, ReferencePools::default()).unwrap();
        let range = generator.birth_dates();

        assert_eq!(range.start(), NaiveDate::from_ymd_opt(1960, 1, 1).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2010, 12, 31).unwrap());
        assert_eq!(range.span_days(), 18627);

        for _ in 0..5000 {
            let patient = generator.next_patient();
            assert!(range.contains(patient.date_of_birth), "{}", patient.date_of_birth);
        }
    }

    #[test]
    fn test_contact_details_follow_format() {
        let mut generator = PatientGenerator::seeded(11, ReferencePools::default()).unwrap();
        let pools = ReferencePools::default();

        for _ in 0..500 {
            let patient = generator.next_patient();

            assert_eq!(patient.phone_number.len(), 10);
            assert!(patient.phone_number.starts_with('9'));
            assert!(patient.phone_number.chars().all(|c| c.is_ascii_digit()));
            assert!(patient.phone_number[1..].parse::<u32>().unwrap() >= 100_000_000);

            let local = patient.email.strip_suffix("@gmail.com").unwrap();
            let prefix = patient.first_name().to_lowercase();
            let suffix: u16 = local.strip_prefix(prefix.as_str()).unwrap().parse().unwrap();
            assert!((1000..=9999).contains(&suffix));

            assert!(pools.cities.contains(&patient.address));
            let last = patient.name.split_whitespace().nth(1).unwrap();
            assert!(pools.last_names.iter().any(|name| name == last));
        }
    }

    #[test]
    fn test_both_genders_are_drawn() {
        let mut generator = PatientGenerator::seeded(3, ReferencePools::default()).unwrap();
        let patients: Vec<NewPatient> = (0..200).map(|_| generator.next_patient()).collect();

        assert!(patients.iter().any(|p| p.gender == Gender::Male));
        assert!(patients.iter().any(|p| p.gender == Gender::Female));
    }

    #[test]
    fn test_batch_has_distinct_contacts() {
        let mut generator = PatientGenerator::seeded(42, ReferencePools::default()).unwrap();

        let batch = generator.generate_batch(1000).unwrap();

        let phones: HashSet<&str> = batch.iter().map(|p| p.phone_number.as_str()).collect();
        let emails: HashSet<&str> = batch.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(batch.len(), 1000);
        assert_eq!(phones.len(), 1000);
        assert_eq!(emails.len(), 1000);
    }

    #[test]
    fn test_batch_reports_exhausted_pools() {
        // One first name and 9000 suffixes cannot yield 9001 distinct emails.
        let pools = ReferencePools::with_first_names(&["Rahul"], &["Rahul"]);
        let mut generator = PatientGenerator::seeded(1, pools).unwrap();

        let result = generator.generate_batch(9001);

        assert_matches!(result, Err(PatientError::ContactSpaceExhausted { requested: 9001, .. }));
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let pools = ReferencePools {
            cities: Vec::new(),
            ..ReferencePools::default()
        };

        let result = PatientGenerator::seeded(1, pools);

        assert_matches!(result, Err(PatientError::EmptyPool("cities")));
    }

    #[test]
    fn test_inverted_birth_range_is_rejected() {
        let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(1960, 1, 1).unwrap();

        assert_matches!(
            BirthDateRange::new(start, end),
            Err(PatientError::InvalidBirthDateRange { .. })
        );
    }
}
