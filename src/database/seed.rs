use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{Ingredient, Recipe};

/// Category labels, seeded with ids 1..=6 in this order
pub const CATEGORIES: &[&str] = &["Science", "Art", "Geography", "History", "Entertainment", "Sports"];

pub struct SeedQuestion {
    pub question: &'static str,
    pub answer: &'static str,
    pub category: i32,
    pub difficulty: i32,
}

const fn q(question: &'static str, answer: &'static str, category: i32, difficulty: i32) -> SeedQuestion {
    SeedQuestion { question, answer, category, difficulty }
}

pub const QUESTIONS: &[SeedQuestion] = &[
    q("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 5, 4),
    q("What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", 5, 4),
    q("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 4, 2),
    q("What was the title of the 1990 fantasy directed by Tim Burton about a young man with multi-bladed appendages?", "Edward Scissorhands", 5, 3),
    q("What boxer's original name is Cassius Clay?", "Muhammad Ali", 4, 1),
    q("Which is the only team to play in every soccer World Cup tournament?", "Brazil", 6, 3),
    q("Which country won the first ever soccer World Cup in 1930?", "Uruguay", 6, 4),
    q("Who invented Peanut Butter?", "George Washington Carver", 4, 2),
    q("What is the largest lake in Africa?", "Lake Victoria", 3, 2),
    q("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    q("The Taj Mahal is located in which Indian city?", "Agra", 3, 2),
    q("Which Dutch graphic artist-initials M C was a creator of optical illusions?", "Escher", 2, 1),
    q("La Giaconda is better known as what?", "Mona Lisa", 2, 3),
    q("How many paintings did Van Gogh sell in his lifetime?", "One", 2, 4),
    q("Which American artist was a pioneer of Abstract Expressionism, and a leading exponent of action painting?", "Jackson Pollock", 2, 2),
    q("What is the heaviest organ in the human body?", "The Liver", 1, 4),
    q("Who discovered penicillin?", "Alexander Fleming", 1, 3),
    q("Hematology is a branch of medicine involving the study of what?", "Blood", 1, 4),
    q("Which dung beetle was worshipped by the ancient Egyptians?", "Scarab", 4, 4),
];

/// The single drink the coffee shop starts with
pub fn default_drinks() -> Vec<(&'static str, Recipe)> {
    vec![(
        "water",
        Recipe(vec![Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 1,
        }]),
    )]
}

/// Insert the seed rows into empty tables. Tables that already hold rows are left alone.
pub async fn seed_postgres(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;

    let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *tx)
        .await?;
    if categories == 0 {
        for (idx, label) in CATEGORIES.iter().enumerate() {
            sqlx::query("INSERT INTO categories (id, type) VALUES ($1, $2)")
                .bind(idx as i32 + 1)
                .bind(label)
                .execute(&mut *tx)
                .await?;
        }
        // Explicit ids bypass the sequence; move it past them
        sqlx::query("SELECT setval(pg_get_serial_sequence('categories', 'id'), (SELECT MAX(id) FROM categories))")
            .execute(&mut *tx)
            .await?;
        info!("Seeded {} categories", CATEGORIES.len());
    }

    let questions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
        .fetch_one(&mut *tx)
        .await?;
    if questions == 0 {
        for seed in QUESTIONS {
            sqlx::query("INSERT INTO questions (question, answer, category, difficulty) VALUES ($1, $2, $3, $4)")
                .bind(seed.question)
                .bind(seed.answer)
                .bind(seed.category)
                .bind(seed.difficulty)
                .execute(&mut *tx)
                .await?;
        }
        info!("Seeded {} questions", QUESTIONS.len());
    }

    let drinks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drinks")
        .fetch_one(&mut *tx)
        .await?;
    if drinks == 0 {
        for (title, recipe) in default_drinks() {
            sqlx::query("INSERT INTO drinks (title, recipe) VALUES ($1, $2)")
                .bind(title)
                .bind(sqlx::types::Json(&recipe))
                .execute(&mut *tx)
                .await?;
        }
        info!("Seeded default drinks");
    }

    tx.commit().await?;
    Ok(())
}
