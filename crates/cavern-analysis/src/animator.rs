//! Spring-mass display animation.
//!
//! Each display bin is treated as a mass tied by a spring to its target
//! spectrum value, with a diffusion pass coupling neighboring bins so the
//! whole display moves like a connected surface instead of 512 independent
//! bouncing dots. The simulation runs one fixed step per render tick.

/// Tuning constants for the spring-mass animation.
///
/// The defaults are tuned empirically for pleasing motion at a ~60 Hz tick
/// rate; they are exposed as configuration rather than baked in so hosts
/// with other tick rates can re-tune.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Spring strength pulling each bin toward its target.
    pub tension: f32,
    /// Per-tick velocity retention (must be below 1.0 to settle).
    pub damping: f32,
    /// Coupling strength between adjacent bins.
    pub spread: f32,
    /// Scale applied to velocity when integrating position.
    pub speed: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 0.025,
            damping: 0.97,
            spread: 0.2,
            speed: 0.05,
        }
    }
}

/// Fixed-timestep spring-mass smoother over a row of display bins.
///
/// Per tick and per bin:
///
/// ```text
/// velocity += tension * (target - position)
/// position += velocity * speed
/// velocity *= damping
/// ```
///
/// followed by a diffusion pass that adds
/// `spread * ((pos[i-1] - pos[i]) + (pos[i+1] - pos[i]))` to each interior
/// bin's velocity. The first and last bins receive no diffusion.
#[derive(Debug, Clone)]
pub struct WaveAnimator {
    position: Vec<f32>,
    velocity: Vec<f32>,
    spread_forces: Vec<f32>,
    config: SpringConfig,
}

impl WaveAnimator {
    /// Create an animator for `bins` display bins, starting at rest.
    pub fn new(bins: usize, config: SpringConfig) -> Self {
        Self {
            position: vec![0.0; bins],
            velocity: vec![0.0; bins],
            spread_forces: vec![0.0; bins],
            config,
        }
    }

    /// Advance the simulation one tick toward `targets`.
    ///
    /// `targets` must have the same length as the animator; extra entries
    /// are ignored and missing ones leave their bins untouched.
    pub fn step(&mut self, targets: &[f32]) {
        for (i, (&target, position)) in targets.iter().zip(self.position.iter_mut()).enumerate() {
            let velocity = &mut self.velocity[i];
            *velocity += self.config.tension * (target - *position);
            *position += *velocity * self.config.speed;
            *velocity *= self.config.damping;
        }

        let n = self.position.len();
        if n < 3 {
            return;
        }
        // Diffusion is computed from the just-updated positions, then
        // applied, so the pass is order-independent.
        for i in 1..n - 1 {
            let left = self.position[i - 1] - self.position[i];
            let right = self.position[i + 1] - self.position[i];
            self.spread_forces[i] = self.config.spread * (left + right);
        }
        for i in 1..n - 1 {
            self.velocity[i] += self.spread_forces[i];
        }
    }

    /// Current animated positions, one per display bin.
    pub fn positions(&self) -> &[f32] {
        &self.position
    }

    /// Number of animated bins.
    pub fn len(&self) -> usize {
        self.position.len()
    }

    /// True if the animator has no bins.
    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    /// Return all bins to rest at zero.
    pub fn reset(&mut self) {
        self.position.fill(0.0);
        self.velocity.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_to_constant_target() {
        let mut animator = WaveAnimator::new(16, SpringConfig::default());
        let targets = vec![0.8f32; 16];
        for _ in 0..4000 {
            animator.step(&targets);
        }
        for (i, &p) in animator.positions().iter().enumerate() {
            assert!(
                (p - 0.8).abs() < 0.01,
                "bin {i} should settle at 0.8, got {p}"
            );
        }
    }

    #[test]
    fn motion_is_smooth_not_instant() {
        let mut animator = WaveAnimator::new(8, SpringConfig::default());
        let targets = vec![1.0f32; 8];
        animator.step(&targets);
        // One tick moves only a sliver of the way.
        assert!(animator.positions()[3] < 0.01);
        for _ in 0..30 {
            animator.step(&targets);
        }
        let after_half_second = animator.positions()[3];
        assert!(after_half_second > 0.01, "should be visibly moving by now");
        assert!(
            after_half_second < 0.9,
            "should still be well short of the target"
        );
    }

    #[test]
    fn diffusion_drags_neighbors_along() {
        // Excite only the middle bin; with diffusion its neighbors must
        // move, and more than the far-away bins do.
        let mut animator = WaveAnimator::new(9, SpringConfig::default());
        let mut targets = vec![0.0f32; 9];
        targets[4] = 1.0;
        for _ in 0..120 {
            animator.step(&targets);
        }
        let positions = animator.positions();
        assert!(positions[3] > 0.0, "neighbor should be pulled up");
        assert!(
            positions[3] > positions[1],
            "coupling should fall off with distance: {} vs {}",
            positions[3],
            positions[1]
        );
    }

    #[test]
    fn boundary_bins_receive_no_spread() {
        // With zero tension the only force is diffusion; boundary bins must
        // stay exactly at rest no matter what their neighbors do.
        let config = SpringConfig {
            tension: 0.0,
            ..SpringConfig::default()
        };
        let mut animator = WaveAnimator::new(6, config);

        // Push interior bins by stepping once with tension, then freeze.
        let mut primed = WaveAnimator::new(6, SpringConfig::default());
        for _ in 0..30 {
            primed.step(&[0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);
        }
        animator.position.copy_from_slice(primed.positions());

        let before_first = animator.positions()[0];
        let before_last = animator.positions()[5];
        for _ in 0..50 {
            animator.step(&[0.0; 6]);
        }
        assert_eq!(animator.positions()[0], before_first);
        assert_eq!(animator.positions()[5], before_last);
    }

    #[test]
    fn undamped_config_would_oscillate_damped_settles() {
        let lively = SpringConfig {
            damping: 1.0,
            ..SpringConfig::default()
        };
        let mut undamped = WaveAnimator::new(4, lively);
        let mut damped = WaveAnimator::new(4, SpringConfig::default());
        let targets = vec![0.5f32; 4];
        for _ in 0..1500 {
            undamped.step(&targets);
            damped.step(&targets);
        }
        // Track the worst deviation over a full oscillation period; the
        // undamped system keeps swinging while the damped one has settled.
        let mut undamped_err = 0.0f32;
        let mut damped_err = 0.0f32;
        for _ in 0..250 {
            undamped.step(&targets);
            damped.step(&targets);
            undamped_err = undamped_err.max((undamped.positions()[1] - 0.5).abs());
            damped_err = damped_err.max((damped.positions()[1] - 0.5).abs());
        }
        assert!(
            damped_err < undamped_err * 0.1,
            "damping should settle closer: {damped_err} vs {undamped_err}"
        );
    }

    #[test]
    fn reset_returns_to_rest() {
        let mut animator = WaveAnimator::new(8, SpringConfig::default());
        for _ in 0..100 {
            animator.step(&[1.0; 8]);
        }
        animator.reset();
        assert!(animator.positions().iter().all(|&p| p == 0.0));
    }
}
