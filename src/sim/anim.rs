//! Frame-based sprite animations
//!
//! The simulation only tracks which frame is showing; the renderer decides
//! what each frame looks like.

/// Animation clips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimKey {
    /// Player standing still
    Idle,
    /// Player running
    Run,
    /// Enemy walking
    Walk,
}

struct Clip {
    frames: &'static [u8],
    fps: f32,
    looping: bool,
}

impl AnimKey {
    fn clip(self) -> Clip {
        match self {
            AnimKey::Idle => Clip {
                frames: &[0],
                fps: 20.0,
                looping: false,
            },
            AnimKey::Run => Clip {
                frames: &[1, 2, 3],
                fps: 10.0,
                looping: true,
            },
            AnimKey::Walk => Clip {
                frames: &[0, 1, 2, 1],
                fps: 4.0,
                looping: true,
            },
        }
    }
}

/// Playback state for one sprite
#[derive(Debug, Clone)]
pub struct Animator {
    key: AnimKey,
    index: usize,
    elapsed: f32,
}

impl Animator {
    pub fn new(key: AnimKey) -> Self {
        Self {
            key,
            index: 0,
            elapsed: 0.0,
        }
    }

    pub fn key(&self) -> AnimKey {
        self.key
    }

    /// Switch clip; with `ignore_if_playing` an already running clip keeps its frame
    pub fn play(&mut self, key: AnimKey, ignore_if_playing: bool) {
        if ignore_if_playing && self.key == key {
            return;
        }
        self.key = key;
        self.index = 0;
        self.elapsed = 0.0;
    }

    pub fn advance(&mut self, dt: f32) {
        let clip = self.key.clip();
        let frame_time = 1.0 / clip.fps;
        self.elapsed += dt;
        while self.elapsed >= frame_time {
            self.elapsed -= frame_time;
            if self.index + 1 < clip.frames.len() {
                self.index += 1;
            } else if clip.looping {
                self.index = 0;
            }
        }
    }

    /// Sprite frame currently shown
    pub fn frame(&self) -> u8 {
        self.key.clip().frames[self.index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_cycles_frames() {
        let mut anim = Animator::new(AnimKey::Run);
        assert_eq!(anim.frame(), 1);
        anim.advance(0.1);
        assert_eq!(anim.frame(), 2);
        anim.advance(0.1);
        assert_eq!(anim.frame(), 3);
        anim.advance(0.1);
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn test_play_ignore_if_playing_keeps_frame() {
        let mut anim = Animator::new(AnimKey::Run);
        anim.advance(0.15);
        let frame = anim.frame();
        anim.play(AnimKey::Run, true);
        assert_eq!(anim.frame(), frame);
        anim.play(AnimKey::Run, false);
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn test_walk_ping_pongs() {
        let mut anim = Animator::new(AnimKey::Walk);
        let mut frames = Vec::new();
        for _ in 0..5 {
            frames.push(anim.frame());
            anim.advance(0.25);
        }
        assert_eq!(frames, vec![0, 1, 2, 1, 0]);
    }
}
