use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// A typed record stored in a fixed remote collection.
///
/// The generic plumbing below the services only ever sees opaque
/// documents; this trait is the bridge from a typed record to its
/// collection name, path identity, and timestamp discipline.
pub trait CatalogRecord:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// The remote collection this record lives in.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    /// Bumps the record's `updated_at` timestamp.
    fn mark_updated(&mut self, at: DateTime<Utc>);
}

/// Fleet vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleCategory {
    Suv,
    Sedan,
    Tempo,
    Bike,
}

/// A rentable vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub category: VehicleCategory,
    pub seats: u32,
    /// Daily rental rate in the business's base currency.
    pub price_per_day: u32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        name: impl Into<String>,
        category: VehicleCategory,
        seats: u32,
        price_per_day: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            seats,
            price_per_day,
            description: None,
            image_url: None,
            available: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

impl CatalogRecord for Vehicle {
    const COLLECTION: &'static str = "vehicles";

    fn id(&self) -> Uuid {
        self.id
    }

    fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// Riding difficulty of a guided bike tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Moderate,
    Challenging,
}

/// A guided motorcycle tour offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeTour {
    pub id: Uuid,
    pub title: String,
    /// Human-readable route summary, e.g. "Manali - Leh - Khardung La".
    pub route: String,
    pub duration_days: u32,
    pub difficulty: Difficulty,
    pub price: u32,
    pub highlights: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BikeTour {
    pub fn new(
        title: impl Into<String>,
        route: impl Into<String>,
        duration_days: u32,
        difficulty: Difficulty,
        price: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            route: route.into(),
            duration_days,
            difficulty,
            price,
            highlights: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_highlight(mut self, highlight: impl Into<String>) -> Self {
        self.highlights.push(highlight.into());
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

impl CatalogRecord for BikeTour {
    const COLLECTION: &'static str = "bikeTours";

    fn id(&self) -> Uuid {
        self.id
    }

    fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// A browsable travel destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: Uuid,
    pub name: String,
    pub region: String,
    pub altitude_m: u32,
    pub best_season: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Destination {
    pub fn new(name: impl Into<String>, region: impl Into<String>, altitude_m: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            region: region.into(),
            altitude_m,
            best_season: None,
            description: None,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_best_season(mut self, season: impl Into<String>) -> Self {
        self.best_season = Some(season.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

impl CatalogRecord for Destination {
    const COLLECTION: &'static str = "destinations";

    fn id(&self) -> Uuid {
        self.id
    }

    fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// A bookable local experience (trek, rafting, homestay, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub location: String,
    pub duration_hours: u32,
    pub price: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Experience {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
        duration_hours: u32,
        price: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            category: category.into(),
            location: location.into(),
            duration_hours,
            price,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

impl CatalogRecord for Experience {
    const COLLECTION: &'static str = "experiences";

    fn id(&self) -> Uuid {
        self.id
    }

    fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

/// A curated multi-day itinerary combining destinations and experiences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub id: Uuid,
    pub title: String,
    pub duration_days: u32,
    pub regions: Vec<String>,
    pub price_estimate: u32,
    /// One summary line per day.
    pub itinerary: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TripPlan {
    pub fn new(title: impl Into<String>, duration_days: u32, price_estimate: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            duration_days,
            regions: Vec::new(),
            price_estimate,
            itinerary: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.regions.push(region.into());
        self
    }

    pub fn with_day(mut self, summary: impl Into<String>) -> Self {
        self.itinerary.push(summary.into());
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

impl CatalogRecord for TripPlan {
    const COLLECTION: &'static str = "tripPlans";

    fn id(&self) -> Uuid {
        self.id
    }

    fn mark_updated(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}
