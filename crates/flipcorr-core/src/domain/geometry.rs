//! Detector-bank geometry.
//!
//! The beam travels along +z with the sample at the origin; the DNS bank
//! rotates in the horizontal (x-z) plane about the vertical y axis.

use serde::{Deserialize, Serialize};

pub const DNS_DETECTOR_COUNT: usize = 24;
pub const DNS_DETECTOR_STEP_DEG: f64 = 5.0;
pub const DNS_BANK_RADIUS_M: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    pub id: u32,
    pub position: [f64; 3],
}

impl Detector {
    /// Signed scattering angle in degrees; positive towards +x.
    pub fn signed_two_theta(&self) -> f64 {
        let [x, _, z] = self.position;
        x.atan2(z).to_degrees()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectorBank {
    detectors: Vec<Detector>,
}

impl DetectorBank {
    pub fn new(detectors: Vec<Detector>) -> Self {
        Self { detectors }
    }

    pub fn uniform(count: usize, start_deg: f64, step_deg: f64, radius: f64) -> Self {
        let detectors = (0..count)
            .map(|index| {
                let angle = (start_deg + step_deg * index as f64).to_radians();
                Detector {
                    id: index as u32,
                    position: [radius * angle.sin(), 0.0, radius * angle.cos()],
                }
            })
            .collect();
        Self { detectors }
    }

    /// The 24-detector DNS bank at the given `deterota` motor position.
    pub fn dns(deterota_deg: f64) -> Self {
        Self::uniform(
            DNS_DETECTOR_COUNT,
            -deterota_deg,
            DNS_DETECTOR_STEP_DEG,
            DNS_BANK_RADIUS_M,
        )
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn get(&self, index: usize) -> Option<&Detector> {
        self.detectors.get(index)
    }

    pub fn signed_two_theta(&self, index: usize) -> Option<f64> {
        self.get(index).map(Detector::signed_two_theta)
    }

    pub fn two_thetas(&self) -> Vec<f64> {
        self.detectors.iter().map(Detector::signed_two_theta).collect()
    }

    /// Rotates every detector about the vertical axis; signed two-theta
    /// increases by `angle_deg`.
    pub fn rotate_about_y(&mut self, angle_deg: f64) {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        for detector in &mut self.detectors {
            let [x, y, z] = detector.position;
            detector.position = [x * cos + z * sin, y, z * cos - x * sin];
        }
    }

    /// Same detectors in the same order; positions may differ.
    pub fn is_compatible_with(&self, other: &DetectorBank) -> bool {
        self.detectors.len() == other.detectors.len()
            && self
                .detectors
                .iter()
                .zip(&other.detectors)
                .all(|(lhs, rhs)| lhs.id == rhs.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{DNS_DETECTOR_COUNT, Detector, DetectorBank};

    #[test]
    fn dns_bank_spaces_detectors_five_degrees_apart() {
        let bank = DetectorBank::dns(-7.53);
        assert_eq!(bank.len(), DNS_DETECTOR_COUNT);

        for (index, two_theta) in bank.two_thetas().into_iter().enumerate() {
            let expected = 7.53 + 5.0 * index as f64;
            assert!(
                (two_theta - expected).abs() < 1.0e-9,
                "detector {index}: {two_theta} != {expected}"
            );
        }
    }

    #[test]
    fn rotation_shifts_signed_two_theta() {
        let mut bank = DetectorBank::uniform(3, 10.0, 20.0, 1.0);
        bank.rotate_about_y(-4.5);

        let angles = bank.two_thetas();
        assert!((angles[0] - 5.5).abs() < 1.0e-9);
        assert!((angles[1] - 25.5).abs() < 1.0e-9);
        assert!((angles[2] - 45.5).abs() < 1.0e-9);
    }

    #[test]
    fn compatibility_ignores_positions_but_not_ids() {
        let reference = DetectorBank::dns(-7.53);
        let mut rotated = reference.clone();
        rotated.rotate_about_y(-8.02);
        assert!(reference.is_compatible_with(&rotated));

        let shorter = DetectorBank::uniform(23, 0.0, 5.0, 0.8);
        assert!(!reference.is_compatible_with(&shorter));

        let mut relabelled: Vec<Detector> = reference.detectors().to_vec();
        relabelled[3].id = 99;
        assert!(!reference.is_compatible_with(&DetectorBank::new(relabelled)));
    }

    #[test]
    fn negative_x_gives_negative_angle() {
        let detector = Detector {
            id: 0,
            position: [-1.0, 0.0, 1.0],
        };
        assert!((detector.signed_two_theta() + 45.0).abs() < 1.0e-12);
    }
}
