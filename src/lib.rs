//! Emotion inference from face landmark geometry.
//!
//! A [`LandmarkSet`] is reduced to a [`FeatureSet`] of scale-invariant
//! ratios and angles, which a fixed rule table scores into one of five
//! [`Emotion`]s.
//!
//! ```
//! use emoface::{Emotion, FeatureSet, classify_features};
//!
//! let smile = FeatureSet {
//!     mouth_openness: 0.5,
//!     corner_angle: 170.,
//!     ..Default::default()
//! };
//! let result = classify_features(&smile);
//! assert_eq!(result.emotion, Emotion::Happy);
//! assert_eq!(result.confidence, 1.);
//! ```

pub mod classify;
pub mod features;
pub mod landmarks;
pub mod overlay;
pub mod preprocess;
pub mod provider;
pub mod shapes;

pub use classify::{
    Classification, Classifier, Emotion, EmotionDetails, ScoreTable, classify, classify_features,
};
pub use features::{FeatureSet, analyze_eyes, analyze_mouth, distance, signed_full_angle, vertex_angle};
pub use landmarks::{LandmarkSet, Region};
pub use provider::{JsonLandmarks, LandmarkProvider};
pub use shapes::point::Point;
