//! 2x3 affine helpers and the shared cosine lookup table.

use glam::{Affine2, Mat2, Vec2};
use once_cell::sync::Lazy;

/// Table entries per full turn. Multiples of 45 degrees land exactly on an entry.
const COS_TABLE_SIZE: usize = 4096;

/// Precomputed cosine over one full turn, indexed by degrees.
#[derive(Debug)]
pub struct CosTable {
    values: Box<[f32]>,
}

static COS_TABLE: Lazy<CosTable> = Lazy::new(CosTable::new);

impl CosTable {
    fn new() -> Self {
        let step = std::f64::consts::TAU / COS_TABLE_SIZE as f64;
        let values = (0..COS_TABLE_SIZE)
            .map(|i| {
                let v = (i as f64 * step).cos();
                // Quarter turns must yield exact zeros.
                if v.abs() < 1e-12 {
                    0.0
                } else {
                    v as f32
                }
            })
            .collect();
        Self { values }
    }

    /// Process-wide table shared by every pose engine.
    #[inline]
    pub fn shared() -> &'static CosTable {
        &COS_TABLE
    }

    #[inline]
    fn slot(degrees: f32) -> usize {
        let units = (degrees * (COS_TABLE_SIZE as f32 / 360.0)).round() as i64;
        units.rem_euclid(COS_TABLE_SIZE as i64) as usize
    }

    #[inline]
    pub fn cos_deg(&self, degrees: f32) -> f32 {
        self.values[Self::slot(degrees)]
    }

    /// Sine as a quarter-turn-shifted cosine lookup.
    #[inline]
    pub fn sin_deg(&self, degrees: f32) -> f32 {
        self.values[Self::slot(degrees - 90.0)]
    }
}

/// Translation * rotation * scale, with rotation taken from the table.
pub fn trs_matrix(translation: Vec2, rotation_deg: f32, scale: Vec2) -> Affine2 {
    let table = CosTable::shared();
    let c = table.cos_deg(rotation_deg);
    let s = table.sin_deg(rotation_deg);
    Affine2::from_mat2_translation(
        Mat2::from_cols(
            Vec2::new(c * scale.x, s * scale.x),
            Vec2::new(-s * scale.y, c * scale.y),
        ),
        translation,
    )
}

/// Scale the linear part column-wise, i.e. `m * diag(scale)`, leaving the
/// translation untouched.
#[inline]
pub fn scale_linear(m: &mut Affine2, scale: Vec2) {
    m.matrix2.x_axis *= scale.x;
    m.matrix2.y_axis *= scale.y;
}

/// Lengths of the two basis vectors.
#[inline]
pub fn axis_scales(m: &Affine2) -> Vec2 {
    Vec2::new(m.matrix2.x_axis.length(), m.matrix2.y_axis.length())
}
