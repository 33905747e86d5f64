use tracing::info;

use super::record::NewAdvocate;
use super::store::{SqliteAdvocateStore, StoreError};

const SPECIALTIES: &[&str] = &[
    "Bipolar",
    "LGBTQ",
    "Medication/Prescribing",
    "Suicide History/Attempts",
    "General Mental Health (anxiety, depression, stress, grief, life transitions)",
    "Men's issues",
    "Relationship Issues (family, friends, couple, etc)",
    "Trauma & PTSD",
    "Personality disorders",
    "Personal growth",
    "Substance use/abuse",
    "Pediatrics",
    "Women's issues (post-partum, infertility, family planning)",
    "Chronic pain",
    "Weight loss & nutrition",
    "Eating disorders",
    "Diabetic Diet and nutrition",
    "Coaching (leadership, career, academic and wellness)",
    "Life coaching",
    "Obsessive-compulsive disorders",
    "Neuropsychological evaluations & testing (ADHD testing)",
    "Attention and Hyperactivity (ADHD)",
    "Sleep issues",
    "Schizophrenia and psychotic disorders",
    "Learning disorders",
    "Domestic abuse",
];

const PEOPLE: &[(&str, &str, &str, &str, u32, i64)] = &[
    ("John", "Doe", "New York", "MD", 10, 5551234567),
    ("Jane", "Smith", "Los Angeles", "PhD", 8, 5559876543),
    ("Alice", "Johnson", "Chicago", "MSW", 5, 5554567890),
    ("Michael", "Brown", "Houston", "MD", 12, 5556543210),
    ("Emily", "Davis", "Phoenix", "PhD", 7, 5553210987),
    ("Chris", "Martinez", "Philadelphia", "MSW", 9, 5557890123),
    ("Jessica", "Taylor", "San Antonio", "MD", 11, 5554561234),
    ("David", "Harris", "San Diego", "PhD", 6, 5557896543),
    ("Laura", "Clark", "Dallas", "MSW", 4, 5550123456),
    ("Daniel", "Lewis", "San Jose", "MD", 13, 5553217654),
    ("Sarah", "Lee", "Austin", "PhD", 10, 5551238765),
    ("James", "King", "Jacksonville", "MSW", 5, 5556540987),
    ("Megan", "Green", "San Francisco", "MD", 14, 5559873456),
    ("Joshua", "Walker", "Columbus", "PhD", 9, 5556781234),
    ("Amanda", "Hall", "Fort Worth", "MSW", 3, 5559872345),
];

/// Deterministic sample records for local development.
pub fn sample_advocates() -> Vec<NewAdvocate> {
    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, &(first, last, city, degree, years, phone))| NewAdvocate {
            first_name: first.to_string(),
            last_name: last.to_string(),
            city: city.to_string(),
            degree: degree.to_string(),
            specialties: pick_specialties(i),
            years_of_experience: years,
            phone_number: phone,
        })
        .collect()
}

// Each record gets one to three tags, spread across the list.
fn pick_specialties(index: usize) -> Vec<String> {
    let count = index % 3 + 1;
    (0..count)
        .map(|k| SPECIALTIES[(index * 5 + k * 7) % SPECIALTIES.len()].to_string())
        .collect()
}

/// Insert the sample records unless the store already holds data.
///
/// With `force`, records are inserted regardless. Returns how many were
/// inserted.
pub async fn seed(store: &SqliteAdvocateStore, force: bool) -> Result<usize, StoreError> {
    let advocates = sample_advocates();
    let ids = if force {
        store.insert_advocates(&advocates).await?
    } else {
        store.seed_if_empty(&advocates).await?
    };
    if ids.is_empty() {
        info!("store already seeded, skipping");
        return Ok(0);
    }

    info!(inserted = ids.len(), db = %store.path().display(), "seeded advocates");
    Ok(ids.len())
}
