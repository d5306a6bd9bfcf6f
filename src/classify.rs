//! Rule-based emotion classification over a [`FeatureSet`].

use crate::features::FeatureSet;
use crate::landmarks::LandmarkSet;
use anyhow::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::{Level, debug, span, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Neutral,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Neutral,
        Emotion::Surprised,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
            Emotion::Surprised => "surprised",
        }
    }

    fn idx(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Emotion> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::msg(format!("Unknown emotion: {s:?}")))
    }
}

/// Accumulated evidence per emotion for one classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTable {
    scores: [u32; 5],
}

impl ScoreTable {
    pub fn get(&self, emotion: Emotion) -> u32 {
        self.scores[emotion.idx()]
    }

    pub fn add(&mut self, emotion: Emotion, weight: u32) {
        self.scores[emotion.idx()] += weight;
    }

    pub fn total(&self) -> u32 {
        self.scores.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, u32)> + '_ {
        Emotion::ALL.into_iter().map(|e| (e, self.get(e)))
    }
}

impl Serialize for ScoreTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Emotion::ALL.len()))?;
        for (emotion, score) in self.iter() {
            map.serialize_entry(emotion.name(), &score)?;
        }
        map.end()
    }
}

struct Rule {
    name: &'static str,
    emotion: Emotion,
    weight: u32,
    applies: fn(&FeatureSet) -> bool,
}

fn neutral_band(angle: f64) -> bool {
    (175.0..=185.0).contains(&angle)
}

const RULES: [Rule; 10] = [
    Rule {
        name: "upturned corners",
        emotion: Emotion::Happy,
        weight: 15,
        applies: |f| f.corner_angle < 180.,
    },
    Rule {
        name: "wide open mouth",
        emotion: Emotion::Happy,
        weight: 4,
        applies: |f| f.mouth_openness > 0.4,
    },
    Rule {
        name: "open mouth",
        emotion: Emotion::Happy,
        weight: 2,
        applies: |f| f.mouth_openness > 0.25 && f.mouth_openness <= 0.4,
    },
    Rule {
        name: "downturned corners",
        emotion: Emotion::Sad,
        weight: 15,
        applies: |f| f.corner_angle > 180.,
    },
    Rule {
        name: "closed mouth",
        emotion: Emotion::Sad,
        weight: 3,
        applies: |f| f.mouth_openness < 0.15,
    },
    Rule {
        name: "sharply downturned corners",
        emotion: Emotion::Angry,
        weight: 4,
        applies: |f| f.corner_angle > 185.,
    },
    Rule {
        name: "pressed lips",
        emotion: Emotion::Angry,
        weight: 5,
        applies: |f| f.mouth_openness < 0.1,
    },
    Rule {
        name: "wide eyes, open mouth",
        emotion: Emotion::Surprised,
        weight: 6,
        applies: |f| {
            f.left_eye_openness > 0.45
                && f.right_eye_openness > 0.45
                && f.mouth_openness > 0.45
                && (175.0..=180.0).contains(&f.corner_angle)
        },
    },
    Rule {
        name: "gaping mouth",
        emotion: Emotion::Surprised,
        weight: 3,
        applies: |f| f.mouth_openness > 0.6 && neutral_band(f.corner_angle),
    },
    Rule {
        name: "relaxed mouth",
        emotion: Emotion::Neutral,
        weight: 5,
        applies: |f| neutral_band(f.corner_angle) && (0.15..=0.35).contains(&f.mouth_openness),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub emotion: Emotion,
    pub scores: ScoreTable,
    pub confidence: f64,
}

/// Applies the rule table and picks a winner. Equal top scores go to
/// whichever emotion comes first in `priority`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    priority: [Emotion; 5],
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            priority: Emotion::ALL,
        }
    }
}

impl Classifier {
    pub fn with_priority(order: &[Emotion]) -> Result<Classifier> {
        let priority: [Emotion; 5] = order.try_into().map_err(|_| {
            Error::msg(format!(
                "Tie-break priority must list all {} emotions, got {}",
                Emotion::ALL.len(),
                order.len()
            ))
        })?;

        for e in Emotion::ALL {
            if !priority.contains(&e) {
                return Err(Error::msg(format!("Tie-break priority is missing {e}")));
            }
        }

        Ok(Classifier { priority })
    }

    pub fn priority(&self) -> &[Emotion; 5] {
        &self.priority
    }

    pub fn classify(&self, landmarks: &LandmarkSet) -> Classification {
        self.classify_features(&FeatureSet::extract(landmarks))
    }

    pub fn classify_features(&self, features: &FeatureSet) -> Classification {
        let span = span!(Level::DEBUG, "classify");
        let _guard = span.enter();

        let mut scores = ScoreTable::default();
        for rule in RULES.iter().filter(|r| (r.applies)(features)) {
            trace!("Rule {:?} fired: {} +{}", rule.name, rule.emotion, rule.weight);
            scores.add(rule.emotion, rule.weight);
        }

        let mut emotion = self.priority[0];
        for &e in &self.priority[1..] {
            if scores.get(e) > scores.get(emotion) {
                emotion = e;
            }
        }

        let total = scores.total();
        let confidence = if total > 0 {
            scores.get(emotion) as f64 / total as f64
        } else {
            0.
        };

        debug!("{emotion} ({confidence:.3}) from {scores:?}");
        Classification {
            emotion,
            scores,
            confidence,
        }
    }
}

pub fn classify(landmarks: &LandmarkSet) -> Classification {
    Classifier::default().classify(landmarks)
}

pub fn classify_features(features: &FeatureSet) -> Classification {
    Classifier::default().classify_features(features)
}

/// Classification plus the measurements behind it, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionDetails {
    pub emotion: Emotion,
    /// Percentage, two decimals
    pub confidence: f64,
    pub scores: ScoreTable,
    pub mouth_openness: f64,
    pub corner_angle: f64,
    pub left_eye_openness: f64,
    pub right_eye_openness: f64,
}

impl EmotionDetails {
    pub fn new(features: &FeatureSet, result: &Classification) -> EmotionDetails {
        EmotionDetails {
            emotion: result.emotion,
            confidence: round_to(result.confidence * 100., 2),
            scores: result.scores,
            mouth_openness: round_to(features.mouth_openness, 3),
            corner_angle: round_to(features.corner_angle, 2),
            left_eye_openness: round_to(features.left_eye_openness, 3),
            right_eye_openness: round_to(features.right_eye_openness, 3),
        }
    }

    pub fn from_landmarks(classifier: &Classifier, landmarks: &LandmarkSet) -> EmotionDetails {
        let features = FeatureSet::extract(landmarks);
        EmotionDetails::new(&features, &classifier.classify_features(&features))
    }
}

fn round_to(v: f64, places: i32) -> f64 {
    let m = 10f64.powi(places);
    (v * m).round() / m
}
