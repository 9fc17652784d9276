// src/core/sample_data.rs

use crate::error::ValidationError;
use crate::models::{Address, Email, FamilySize, Income, Name, Person, Phone, Priority, Tag};

/// (name, phone, email, address, priority, income, family size, tags)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    Priority,
    f64,
    u32,
    &'static [&'static str],
);

const SAMPLE_ROWS: &[SampleRow] = &[
    (
        "Alex Yeoh",
        "87438807",
        "alexyeoh@example.com",
        "Blk 30 Geylang Street 29, #06-40",
        Priority::High,
        1200.0,
        3,
        &["elderly"],
    ),
    (
        "Bernice Yu",
        "99272758",
        "berniceyu@example.com",
        "Blk 30 Lorong 3 Serangoon Gardens, #07-18",
        Priority::Medium,
        3400.0,
        2,
        &["singleparent"],
    ),
    (
        "Charlotte Oliveiro",
        "93210283",
        "charlotte@example.com",
        "Blk 11 Ang Mo Kio Street 74, #11-04",
        Priority::Low,
        5200.0,
        4,
        &[],
    ),
    (
        "David Li",
        "91031282",
        "lidavid@example.com",
        "Blk 436 Serangoon Gardens Street 26, #16-43",
        Priority::High,
        800.0,
        5,
        &["unemployed"],
    ),
    (
        "Irfan Ibrahim",
        "92492021",
        "irfan@example.com",
        "Blk 47 Tampines Street 20, #17-35",
        Priority::Medium,
        2600.0,
        1,
        &[],
    ),
    (
        "Roy Balakrishnan",
        "92624417",
        "royb@example.com",
        "Blk 45 Aljunied Street 85, #11-31",
        Priority::Low,
        4100.0,
        6,
        &["disability"],
    ),
];

fn sample_person(row: &SampleRow) -> Result<Person, ValidationError> {
    let (name, phone, email, address, priority, income, family_size, tags) = *row;
    let mut person = Person::new(
        Name::parse(name)?,
        Phone::parse(phone)?,
        Email::parse(email)?,
        Address::parse(address)?,
    );
    person.priority = priority;
    person.income = Income::new(income)?;
    person.family_size = FamilySize::new(family_size)?;
    person.tags = tags.iter().map(|t| Tag::parse(t)).collect::<Result<_, _>>()?;
    Ok(person)
}

/// The persons shown on first launch, when no data file exists yet.
pub fn sample_persons() -> Vec<Person> {
    SAMPLE_ROWS
        .iter()
        .filter_map(|row| {
            sample_person(row)
                .map_err(|e| log::error!("Skipping invalid sample person '{}': {}", row.0, e))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sample_row_is_valid() {
        let persons = sample_persons();
        assert_eq!(persons.len(), SAMPLE_ROWS.len());
        assert!(persons.iter().all(|p| !p.archived));
    }
}
