//! Movie catalog and the access-gated rating projection.
//!
//! The catalog is a seeded in-memory sequence shared by all requests. Listing
//! produces per-request copies; the rating field is derived fresh on every
//! read for non-anonymous callers and absent for anonymous ones.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::identity::RequestContext;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Director {
    pub name: String,
    pub birthday: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub birthday: String,
    pub country: String,
    pub directors: Vec<Director>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub actors: Vec<Actor>,
}

/// Per-request projection of a movie: a copy of the record plus the gated
/// rating, present only for authenticated callers.
#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

pub const RATING_MIN: u8 = 5;
pub const RATING_MAX: u8 = 9;

/// Source for rating draws, injected so tests can pin the values.
pub trait RatingSource: Send + Sync {
    /// One draw in RATING_MIN..=RATING_MAX.
    fn draw(&self) -> u8;
}

/// Production source backed by the thread-local generator.
pub struct RandomRating;

impl RatingSource for RandomRating {
    fn draw(&self) -> u8 {
        rand::thread_rng().gen_range(RATING_MIN..=RATING_MAX)
    }
}

/// Shared movie catalog. Cloneable handle; mutation (seeding) is atomic with
/// respect to concurrent listings.
#[derive(Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<Vec<Movie>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, movies: Vec<Movie>) {
        self.inner.write().extend(movies);
    }

    /// The access-gated projection. Copies every record; attaches a rating of
    /// the form "<n>.0" re-rolled per movie per call when the context is
    /// non-anonymous, and no rating otherwise. The shared catalog is never
    /// mutated.
    pub fn list(&self, ctx: &RequestContext, ratings: &dyn RatingSource) -> Vec<MovieView> {
        let authenticated = !ctx.principal.is_anonymous();
        self.inner
            .read()
            .iter()
            .map(|movie| MovieView {
                movie: movie.clone(),
                rating: if authenticated { Some(format!("{}.0", ratings.draw())) } else { None },
            })
            .collect()
    }
}

/// The two-movie sample data set the server seeds at startup.
pub fn sample_movies() -> Vec<Movie> {
    vec![
        Movie {
            title: "Harry Potter and the Chamber of Secrets".to_string(),
            year: 2001,
            actors: vec![Actor {
                name: "Big Ben".to_string(),
                birthday: "1975".to_string(),
                country: "England".to_string(),
                directors: vec![Director {
                    name: "John Heart".to_string(),
                    birthday: "1977".to_string(),
                    country: "USA".to_string(),
                }],
            }],
        },
        Movie {
            title: "Jurassic Park".to_string(),
            year: 1995,
            actors: vec![Actor {
                name: "George T. Owel".to_string(),
                birthday: "1956".to_string(),
                country: "Irland".to_string(),
                directors: vec![Director {
                    name: "Ling Dingding".to_string(),
                    birthday: "1988".to_string(),
                    country: "China".to_string(),
                }],
            }],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Authenticator, RequestContext};

    struct FixedRating(u8);

    impl RatingSource for FixedRating {
        fn draw(&self) -> u8 {
            self.0
        }
    }

    fn bound_context() -> RequestContext {
        let auth = Authenticator::default();
        auth.register("alice", "pw1");
        let (_, session) = auth.login("alice", "pw1").unwrap();
        RequestContext { principal: auth.resolve_session(&session.token) }
    }

    #[test]
    fn anonymous_listing_has_no_rating() {
        let catalog = Catalog::new();
        catalog.seed(sample_movies());
        let views = catalog.list(&RequestContext::anonymous(), &FixedRating(7));
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.rating.is_none()));
    }

    #[test]
    fn authenticated_listing_has_formatted_rating_on_every_record() {
        let catalog = Catalog::new();
        catalog.seed(sample_movies());
        let views = catalog.list(&bound_context(), &FixedRating(7));
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.rating.as_deref() == Some("7.0")));
    }

    #[test]
    fn random_ratings_stay_in_range() {
        let catalog = Catalog::new();
        catalog.seed(sample_movies());
        let ctx = bound_context();
        for _ in 0..50 {
            for view in catalog.list(&ctx, &RandomRating) {
                let rating = view.rating.expect("authenticated view has a rating");
                let (n, frac) = rating.split_once('.').expect("<n>.0 format");
                assert_eq!(frac, "0");
                let n: u8 = n.parse().unwrap();
                assert!((RATING_MIN..=RATING_MAX).contains(&n), "rating {} out of range", n);
            }
        }
    }

    #[test]
    fn listing_does_not_mutate_the_catalog() {
        let catalog = Catalog::new();
        catalog.seed(sample_movies());
        let ctx = bound_context();
        let _ = catalog.list(&ctx, &FixedRating(9));
        let after = catalog.list(&RequestContext::anonymous(), &FixedRating(9));
        let base: Vec<Movie> = after.into_iter().map(|v| v.movie).collect();
        assert_eq!(base, sample_movies());
    }
}
