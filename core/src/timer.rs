use serde::{Deserialize, Serialize};

/// Elapsed-seconds counter driven by ticks from an outside timer service.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    elapsed_secs: u32,
    running: bool,
}

impl Timer {
    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Starts counting from zero.
    pub fn start(&mut self) {
        self.elapsed_secs = 0;
        self.running = true;
    }

    /// Stops counting, keeping the elapsed time. Calling it again has no effect.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances one second, returning the new elapsed time when running.
    pub fn tick(&mut self) -> Option<u32> {
        if self.running {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            Some(self.elapsed_secs)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_only_while_running() {
        let mut timer = Timer::default();
        assert_eq!(timer.tick(), None);

        timer.start();
        assert_eq!(timer.tick(), Some(1));
        assert_eq!(timer.tick(), Some(2));

        timer.stop();
        timer.stop();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.elapsed_secs(), 2);
        assert!(!timer.is_running());
    }

    #[test]
    fn start_resets_elapsed_time() {
        let mut timer = Timer::default();
        timer.start();
        timer.tick();

        timer.start();

        assert_eq!(timer.elapsed_secs(), 0);
        assert!(timer.is_running());
    }
}
