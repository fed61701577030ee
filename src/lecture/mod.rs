//! Interactive lecture topics and the data behind their visualizations.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const GRAVITY: f64 = 9.81;
const TRAJECTORY_SAMPLES: usize = 100;
// Where along the flight the velocity components are shown
const VELOCITY_SAMPLE_AT: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LectureTopic {
    ProjectileMotion,
    NormalTangent,
    PolarCoordinates,
}

impl LectureTopic {
    pub const ALL: [LectureTopic; 3] = [
        LectureTopic::ProjectileMotion,
        LectureTopic::NormalTangent,
        LectureTopic::PolarCoordinates,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            LectureTopic::ProjectileMotion => "projectile-motion",
            LectureTopic::NormalTangent => "normal-tangent",
            LectureTopic::PolarCoordinates => "polar-coordinates",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LectureTopic::ProjectileMotion => "Projectile Motion",
            LectureTopic::NormalTangent => "Normal & Tangent",
            LectureTopic::PolarCoordinates => "Polar Coordinates",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.slug() == slug)
    }
}

impl fmt::Display for LectureTopic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Trajectory {
    pub v0: f64,
    pub angle: f64,
    pub flight_time: f64,
    pub range: f64,
    pub max_height: f64,
    pub points: Vec<Point>,
    pub velocity: VelocitySample,
}

/// Velocity components at one instant of the flight. `vx` never
/// changes, `vy` falls linearly with time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VelocitySample {
    pub at: Point,
    pub vx: f64,
    pub vy: f64,
}

/// Samples the flight of a projectile launched from the ground. Inputs
/// are clamped to the ranges offered by the lecture sliders.
pub fn projectile_trajectory(v0: f64, angle_deg: f64) -> Trajectory {
    let v0 = v0.clamp(10.0, 100.0);
    let angle = angle_deg.clamp(10.0, 85.0);
    let theta = angle.to_radians();
    let (vx, vy) = (v0 * theta.cos(), v0 * theta.sin());
    let flight_time = 2.0 * vy / GRAVITY;

    let position = |t: f64| Point {
        t,
        x: vx * t,
        y: vy * t - 0.5 * GRAVITY * t * t,
    };
    let step = flight_time / (TRAJECTORY_SAMPLES - 1) as f64;
    let points = (0..TRAJECTORY_SAMPLES)
        .map(|i| position(step * i as f64))
        .collect();
    let t_sample = flight_time * VELOCITY_SAMPLE_AT;

    Trajectory {
        v0,
        angle,
        flight_time,
        range: vx * flight_time,
        max_height: vy * vy / (2.0 * GRAVITY),
        points,
        velocity: VelocitySample {
            at: position(t_sample),
            vx,
            vy: vy - GRAVITY * t_sample,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// Position and unit vectors of a point given in polar coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PolarBasis {
    pub r: f64,
    pub theta: f64,
    pub position: Vector2,
    pub e_r: Vector2,
    pub e_theta: Vector2,
}

/// `e_r` points away from the origin, `e_theta` is `e_r` turned 90°
/// counterclockwise. `theta_deg` is in degrees.
pub fn polar_basis(r: f64, theta_deg: f64) -> PolarBasis {
    let (sin, cos) = theta_deg.to_radians().sin_cos();
    PolarBasis {
        r,
        theta: theta_deg,
        position: Vector2 {
            x: r * cos,
            y: r * sin,
        },
        e_r: Vector2 { x: cos, y: sin },
        e_theta: Vector2 { x: -sin, y: cos },
    }
}

/// Normal acceleration on a curved path, a_n = v²/ρ.
pub fn normal_acceleration(speed: f64, radius: f64) -> Option<f64> {
    (radius > 0.0).then(|| speed * speed / radius)
}
