//! Geometry for the three-axis pillar radar chart.
//!
//! Coordinates are in unit-radius space: a score of 100 lands on the unit
//! circle, 0 on the origin. Governance points straight up; Social and
//! Environmental follow counter-clockwise at 120° intervals.

use esg_schema::{Pillar, SimulationInput, PILLAR_MAX};

/// Reference rings drawn behind the profile polygon, as score values.
pub const RING_SCORES: [u8; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarAxis {
    pub pillar: Pillar,
    pub score: u8,
    pub angle_deg: f64,
    pub vertex: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarProfile {
    axes: [RadarAxis; 3],
}

pub fn axis_angle_deg(pillar: Pillar) -> f64 {
    match pillar {
        Pillar::Governance => 90.0,
        Pillar::Social => 210.0,
        Pillar::Environmental => 330.0,
    }
}

/// Point at `score` along the axis of `pillar`.
pub fn axis_point(pillar: Pillar, score: f64) -> (f64, f64) {
    let radius = score / PILLAR_MAX as f64;
    let angle = axis_angle_deg(pillar).to_radians();
    (radius * angle.cos(), radius * angle.sin())
}

impl RadarProfile {
    pub fn from_input(input: &SimulationInput) -> Self {
        let axes = Pillar::ALL.map(|pillar| {
            let score = input.pillar(pillar);
            RadarAxis {
                pillar,
                score,
                angle_deg: axis_angle_deg(pillar),
                vertex: axis_point(pillar, score as f64),
            }
        });
        Self { axes }
    }

    pub fn axes(&self) -> &[RadarAxis; 3] {
        &self.axes
    }

    /// Closed outline of the profile: the first vertex is repeated at the end.
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        closed(self.axes.iter().map(|axis| axis.vertex))
    }

    /// Closed outline of the reference ring at `score`.
    pub fn ring(score: u8) -> Vec<(f64, f64)> {
        closed(
            Pillar::ALL
                .iter()
                .map(|pillar| axis_point(*pillar, score as f64)),
        )
    }

    /// Consecutive point pairs of a closed outline, ready to draw as segments.
    pub fn segments(points: &[(f64, f64)]) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
        points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

fn closed(points: impl Iterator<Item = (f64, f64)>) -> Vec<(f64, f64)> {
    let mut outline: Vec<(f64, f64)> = points.collect();
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn full_governance_points_up() {
        let input = SimulationInput::clamped(100, 0, 0, 0.0, 0.0);
        let profile = RadarProfile::from_input(&input);
        assert!(approx(profile.axes()[0].vertex, (0.0, 1.0)));
        assert!(approx(profile.axes()[1].vertex, (0.0, 0.0)));
        assert!(approx(profile.axes()[2].vertex, (0.0, 0.0)));
    }

    #[test]
    fn vertices_scale_with_score() {
        let input = SimulationInput::clamped(50, 50, 50, 0.0, 0.0);
        let profile = RadarProfile::from_input(&input);
        for axis in profile.axes() {
            let (x, y) = axis.vertex;
            assert!(((x * x + y * y).sqrt() - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn polygon_is_closed() {
        let profile = RadarProfile::from_input(&SimulationInput::default());
        let outline = profile.polygon();
        assert_eq!(outline.len(), 4);
        assert_eq!(outline.first(), outline.last());
        assert_eq!(RadarProfile::segments(&outline).count(), 3);
    }

    #[test]
    fn outer_ring_sits_on_unit_circle() {
        for (x, y) in RadarProfile::ring(100) {
            assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-9);
        }
    }
}
