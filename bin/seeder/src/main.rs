use chrono::{Duration, Utc};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use eyre::Report;
use packmule_core::repositories::{BookingStore, PgStore};
use packmule_primitives::models::entities::announcement::Announcement;
use packmule_primitives::models::entities::enum_types::{AnnouncementStatus, CurrencyCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Report> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().init();

    let db_url = SecretString::from(
        std::env::var("DATABASE_URL").map_err(|_| eyre::eyre!("DATABASE_URL must be set"))?,
    );

    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(db_url.expose_secret()))?;

    let store = PgStore::new(pool);

    let routes = [
        ("Paris", "Dakar", 23.0, 9.5),
        ("Lyon", "Montreal", 15.0, 12.0),
        ("Marseille", "Casablanca", 20.0, 7.0),
        ("Geneva", "London", 10.0, 11.5),
    ];

    let now = Utc::now();

    for (idx, (origin, destination, max_weight_kg, price_per_kg)) in routes.iter().enumerate() {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            traveler_id: Uuid::new_v4(),
            origin: (*origin).to_string(),
            destination: (*destination).to_string(),
            departure_date: now + Duration::days(3 + idx as i64),
            arrival_date: now + Duration::days(4 + idx as i64),
            max_weight_kg: *max_weight_kg,
            price_per_kg: *price_per_kg,
            currency: CurrencyCode::EUR,
            status: AnnouncementStatus::Active,
            created_at: now,
            updated_at: now,
        };

        store
            .insert_announcement(announcement.clone())
            .await
            .map_err(|e| eyre::eyre!("seed failed: {}", e))?;

        info!(
            announcement_id = %announcement.id,
            origin,
            destination,
            "Seeded announcement"
        );
    }

    info!("Seeding complete");
    Ok(())
}
