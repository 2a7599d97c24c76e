// The falling glyph field.
//
// A field is a fixed set of `columns × rows_per_column` particles laid out in
// vertical lanes. Nothing is allocated or dropped after `ParticleField::new`;
// every frame only moves particles down their lane, wraps the ones that left
// the bottom of the viewport back to the top, and occasionally swaps glyphs.

use rand::Rng;

use crate::config::{ConfigError, FieldConfig};
use crate::particle::Particle;

/// Vertical distance between neighbouring glyphs of a lane, in glyph sizes.
const ROW_PITCH: f64 = 1.5;
const MIN_OPACITY: f64 = 0.1;
const OPACITY_RANGE: f64 = 0.8;

/// Ordered, non-empty set of glyphs particles draw from.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPool {
    glyphs: Vec<char>,
}

impl GlyphPool {
    pub fn new(glyphs: &str) -> Result<GlyphPool, ConfigError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            return Err(ConfigError::EmptyGlyphPool);
        }
        Ok(GlyphPool { glyphs })
    }

    /// Uniform pick; may return the glyph a particle already shows.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> char {
        self.glyphs[rng.gen_range(0, self.glyphs.len())]
    }

    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.glyphs.contains(&glyph)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

pub struct ParticleField {
    particles: Vec<Particle>,
    lane_speeds: Vec<f64>,
    pool: GlyphPool,
    size: f64,
    flicker_chance: f64,
}

impl ParticleField {
    pub fn new<R: Rng>(config: &FieldConfig, rng: &mut R) -> Result<ParticleField, ConfigError> {
        config.validate()?;
        let pool = GlyphPool::new(&config.glyphs)?;

        let columns = config.columns;
        let rows = config.rows_per_column;
        let half_columns = columns as f64 / 2.0;

        let mut particles = Vec::with_capacity(columns * rows);
        let mut lane_speeds = Vec::with_capacity(columns);
        for i in 0..columns {
            let x = (i as f64 - half_columns) * config.spacing;
            let start_y = symmetric(rng, config.start_spread);
            let lane_speed = config.base_speed + symmetric(rng, config.speed_jitter);
            lane_speeds.push(lane_speed);

            for j in 0..rows {
                let y = start_y - j as f64 * config.size * ROW_PITCH;
                let opacity = MIN_OPACITY + (j as f64 / rows as f64) * OPACITY_RANGE;
                particles.push(Particle::new(i, x, y, lane_speed, pool.pick(rng), opacity));
            }
        }

        log::debug!(
            "particle field: {} lanes x {} rows, {} glyphs",
            columns,
            rows,
            pool.len()
        );

        Ok(ParticleField {
            particles,
            lane_speeds,
            pool,
            size: config.size,
            flicker_chance: config.flicker_chance,
        })
    }

    /// Advances every particle by one frame.
    ///
    /// A particle already below `-viewport_height / 2 - size` is moved to
    /// `viewport_height / 2 + size` with a fresh glyph instead of falling.
    /// Independently, each particle swaps its glyph with `flicker_chance`.
    pub fn update<R: Rng>(&mut self, viewport_height: f64, rng: &mut R) {
        let bottom = -viewport_height / 2.0 - self.size;
        let top = viewport_height / 2.0 + self.size;
        let pool = &self.pool;

        for particle in self.particles.iter_mut() {
            if particle.pos[1] < bottom {
                particle.pos[1] = top;
                particle.glyph = pool.pick(rng);
            } else {
                particle.pos[1] -= particle.lane_speed;
            }

            if rng.gen_bool(self.flicker_chance) {
                particle.glyph = pool.pick(rng);
            }
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn lane_speeds(&self) -> &[f64] {
        &self.lane_speeds
    }

    pub fn glyph_pool(&self) -> &GlyphPool {
        &self.pool
    }

    /// Edge length of one glyph quad.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

// Uniform in [-spread, spread); gen_range panics on an empty range
fn symmetric<R: Rng>(rng: &mut R, spread: f64) -> f64 {
    if spread > 0.0 {
        rng.gen_range(-spread, spread)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn still_config() -> FieldConfig {
        FieldConfig {
            flicker_chance: 0.0,
            ..FieldConfig::default()
        }
    }

    #[test]
    fn test_particle_count() {
        let mut rng = rng();
        for &(columns, rows) in &[(1, 1), (2, 3), (60, 20), (7, 13)] {
            let config = FieldConfig {
                columns,
                rows_per_column: rows,
                ..FieldConfig::default()
            };
            let field = ParticleField::new(&config, &mut rng).unwrap();
            assert_eq!(field.len(), columns * rows);
            assert_eq!(field.lane_speeds().len(), columns);
        }
    }

    #[test]
    fn test_rejects_empty_pool() {
        let config = FieldConfig {
            glyphs: String::new(),
            ..FieldConfig::default()
        };
        assert!(matches!(
            ParticleField::new(&config, &mut rng()),
            Err(ConfigError::EmptyGlyphPool)
        ));
    }

    #[test]
    fn test_two_column_layout() {
        let config = FieldConfig {
            columns: 2,
            rows_per_column: 3,
            spacing: 5.0,
            size: 2.0,
            ..FieldConfig::default()
        };
        let field = ParticleField::new(&config, &mut rng()).unwrap();
        let particles = field.particles();

        let lane0: Vec<&Particle> = particles.iter().filter(|p| p.column_index() == 0).collect();
        let lane1: Vec<&Particle> = particles.iter().filter(|p| p.column_index() == 1).collect();
        assert_eq!(lane0.len(), 3);
        assert_eq!(lane1.len(), 3);
        assert!(lane0.iter().all(|p| p.position()[0] == -5.0));
        assert!(lane1.iter().all(|p| p.position()[0] == 0.0));

        for lane in [&lane0, &lane1].iter() {
            for pair in lane.windows(2) {
                let gap = pair[0].position()[1] - pair[1].position()[1];
                assert!((gap - 3.0).abs() < 1e-9, "row gap was {}", gap);
            }
        }
    }

    #[test]
    fn test_opacity_by_rank() {
        let config = FieldConfig {
            columns: 3,
            rows_per_column: 4,
            ..FieldConfig::default()
        };
        let field = ParticleField::new(&config, &mut rng()).unwrap();
        let expected = [0.1, 0.3, 0.5, 0.7];
        for lane in field.particles().chunks(4) {
            for (p, want) in lane.iter().zip(expected.iter()) {
                assert!((p.opacity() - want).abs() < 1e-12, "{} != {}", p.opacity(), want);
            }
        }
    }

    #[test]
    fn test_lane_speeds_within_jitter_and_shared() {
        let config = FieldConfig::default();
        let field = ParticleField::new(&config, &mut rng()).unwrap();
        for (lane, speed) in field.lane_speeds().iter().enumerate() {
            assert!(*speed >= 0.4 && *speed < 0.6, "lane {} speed {}", lane, speed);
        }
        for p in field.particles() {
            assert_eq!(p.lane_speed(), field.lane_speeds()[p.column_index()]);
        }
    }

    #[test]
    fn test_start_offsets_within_spread() {
        let config = FieldConfig::default();
        let field = ParticleField::new(&config, &mut rng()).unwrap();
        for lane in field.particles().chunks(config.rows_per_column) {
            let head = lane[0].position()[1];
            assert!(head >= -100.0 && head < 100.0);
        }
    }

    #[test]
    fn test_x_and_opacity_never_change() {
        let mut rng = rng();
        let mut field = ParticleField::new(&FieldConfig::default(), &mut rng).unwrap();
        let before: Vec<Particle> = field.particles().to_vec();

        for _ in 0..2_000 {
            field.update(600.0, &mut rng);
        }

        for (old, new) in before.iter().zip(field.particles()) {
            assert_eq!(old.position()[0], new.position()[0]);
            assert_eq!(old.opacity(), new.opacity());
            assert_eq!(old.column_index(), new.column_index());
            assert_eq!(old.lane_speed(), new.lane_speed());
        }
    }

    #[test]
    fn test_step_falls_by_lane_speed() {
        let mut rng = rng();
        let mut field = ParticleField::new(&FieldConfig::default(), &mut rng).unwrap();
        let viewport_height = 10_000.0;
        let bottom = -viewport_height / 2.0 - field.size();
        let before: Vec<Particle> = field.particles().to_vec();

        field.update(viewport_height, &mut rng);

        for (old, new) in before.iter().zip(field.particles()) {
            assert!(old.position()[1] >= bottom);
            assert_eq!(new.position()[1], old.position()[1] - old.lane_speed());
        }
    }

    #[test]
    fn test_recycle_moves_to_top_with_pool_glyph() {
        let mut rng = rng();
        let mut field = ParticleField::new(&still_config(), &mut rng).unwrap();
        let viewport_height = 400.0;
        let size = field.size();
        let bottom = -viewport_height / 2.0 - size;

        field.particles[0].pos[1] = bottom - 0.01;
        field.particles[1].pos[1] = bottom;
        let resting = field.particles[1];

        field.update(viewport_height, &mut rng);

        let recycled = field.particles()[0];
        assert_eq!(recycled.position()[1], viewport_height / 2.0 + size);
        assert!(field.glyph_pool().contains(recycled.glyph()));

        // exactly on the bound is still falling
        let fallen = field.particles()[1];
        assert_eq!(fallen.position()[1], resting.position()[1] - resting.lane_speed());
    }

    #[test]
    fn test_particles_settle_inside_viewport_band() {
        let mut rng = rng();
        let config = FieldConfig {
            columns: 4,
            rows_per_column: 5,
            ..still_config()
        };
        let mut field = ParticleField::new(&config, &mut rng).unwrap();
        let viewport_height = 50.0;
        let top = viewport_height / 2.0 + field.size();
        let bottom = -viewport_height / 2.0 - field.size();
        let fastest = field.lane_speeds().iter().cloned().fold(0.0, f64::max);

        // long enough for every particle to have wrapped at least once
        for _ in 0..1_000 {
            field.update(viewport_height, &mut rng);
        }
        for _ in 0..1_000 {
            field.update(viewport_height, &mut rng);
            for p in field.particles() {
                let y = p.position()[1];
                assert!(y <= top && y >= bottom - fastest, "y = {}", y);
            }
        }
    }

    #[test]
    fn test_no_flicker_keeps_glyphs() {
        let mut rng = rng();
        let mut field = ParticleField::new(&still_config(), &mut rng).unwrap();
        let before: Vec<char> = field.particles().iter().map(|p| p.glyph()).collect();
        field.update(10_000.0, &mut rng);
        let after: Vec<char> = field.particles().iter().map(|p| p.glyph()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_flicker_changes_glyphs_but_not_motion() {
        let mut rng = rng();
        let config = FieldConfig {
            flicker_chance: 1.0,
            ..FieldConfig::default()
        };
        let mut field = ParticleField::new(&config, &mut rng).unwrap();
        let before: Vec<Particle> = field.particles().to_vec();

        field.update(10_000.0, &mut rng);

        let changed = before
            .iter()
            .zip(field.particles())
            .filter(|(old, new)| old.glyph() != new.glyph())
            .count();
        assert!(changed > before.len() / 2);
        for (old, new) in before.iter().zip(field.particles()) {
            assert_eq!(new.position()[1], old.position()[1] - old.lane_speed());
            assert_eq!(new.opacity(), old.opacity());
            assert!(field.glyph_pool().contains(new.glyph()));
        }
    }

    #[test]
    fn test_default_flicker_rate_is_one_percent() {
        let mut rng = rng();
        let config = FieldConfig {
            base_speed: 0.0,
            speed_jitter: 0.0,
            ..FieldConfig::default()
        };
        assert_eq!(config.flicker_chance, 0.01);
        let mut field = ParticleField::new(&config, &mut rng).unwrap();
        let start: Vec<f64> = field.particles().iter().map(|p| p.position()[1]).collect();
        let frames = 1_000;
        let mut changes = 0;

        for _ in 0..frames {
            let before: Vec<char> = field.particles().iter().map(|p| p.glyph()).collect();
            field.update(10_000.0, &mut rng);
            changes += before
                .iter()
                .zip(field.particles())
                .filter(|(old, new)| **old != new.glyph())
                .count();
        }

        // a re-pick lands on the same glyph 1 time in pool.len()
        let pool = field.glyph_pool().len() as f64;
        let expected = 0.01 * (pool - 1.0) / pool;
        let observed = changes as f64 / (frames * field.len()) as f64;
        assert!(
            (observed - expected).abs() < expected * 0.05,
            "flicker rate {} vs {}",
            observed,
            expected
        );
        // nothing moved, so no change came from recycling
        let mut still = field.particles().iter().zip(&start);
        assert!(still.all(|(p, y)| p.position()[1] == *y));
    }

    #[test]
    fn test_pool_pick_is_member() {
        let pool = GlyphPool::new("XYZ").unwrap();
        let mut rng = rng();
        for _ in 0..100 {
            assert!(pool.contains(pool.pick(&mut rng)));
        }
        assert_eq!(pool.glyphs(), &['X', 'Y', 'Z']);
    }
}
