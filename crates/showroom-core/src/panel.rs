use crate::constants::{PANEL_EASE, PROGRESS_EPSILON};

/// Top-level UI panels, in timeline order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Panel {
    #[default]
    Home,
    Work,
    Contact,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Home, Panel::Work, Panel::Contact];

    /// Timeline progress at which this panel's beat sits.
    pub fn progress(self) -> f32 {
        match self {
            Panel::Home => 0.0,
            Panel::Work => 0.5,
            Panel::Contact => 1.0,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Panel::Home => "home",
            Panel::Work => "work",
            Panel::Contact => "contact",
        }
    }

    /// Accepts `work`, `#work` and `/work`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        let s = slug.trim().trim_start_matches(['#', '/']);
        Panel::ALL.into_iter().find(|p| p.slug().eq_ignore_ascii_case(s))
    }

    fn index(self) -> usize {
        Panel::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<Self> {
        Panel::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Panel::ALL[i])
    }
}

/// Notification emitted when the active panel changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelChanged {
    pub from: Panel,
    pub to: Panel,
}

/// Maps navigation to a target progress and eases the current progress.
#[derive(Clone, Debug)]
pub struct PanelController {
    active: Panel,
    target: f32,
    current: f32,
}

impl PanelController {
    pub fn new(initial: Panel) -> Self {
        Self {
            active: initial,
            target: initial.progress(),
            current: initial.progress(),
        }
    }

    pub fn active(&self) -> Panel {
        self.active
    }

    pub fn navigate(&mut self, panel: Panel) -> Option<PanelChanged> {
        if panel == self.active {
            return None;
        }
        let change = PanelChanged {
            from: self.active,
            to: panel,
        };
        self.active = panel;
        self.target = panel.progress();
        log::info!("[panel] {} -> {}", change.from.slug(), change.to.slug());
        Some(change)
    }

    pub fn next(&mut self) -> Option<PanelChanged> {
        self.active.next().and_then(|p| self.navigate(p))
    }

    pub fn previous(&mut self) -> Option<PanelChanged> {
        self.active.previous().and_then(|p| self.navigate(p))
    }

    /// Advance the eased progress by one frame and return it.
    pub fn step(&mut self, reduced_motion: bool) -> f32 {
        if reduced_motion {
            self.current = self.target;
        } else {
            self.current += (self.target - self.current) * PANEL_EASE;
            if (self.target - self.current).abs() < PROGRESS_EPSILON {
                self.current = self.target;
            }
        }
        self.current
    }

    pub fn progress(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}

impl Default for PanelController {
    fn default() -> Self {
        Self::new(Panel::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip_with_prefixes() {
        assert_eq!(Panel::from_slug("#work"), Some(Panel::Work));
        assert_eq!(Panel::from_slug("/Contact"), Some(Panel::Contact));
        assert_eq!(Panel::from_slug("about"), None);
    }

    #[test]
    fn navigation_eases_and_settles() {
        let mut pc = PanelController::default();
        assert_eq!(pc.navigate(Panel::Home), None);
        let change = pc.navigate(Panel::Contact).unwrap();
        assert_eq!(change.from, Panel::Home);
        assert_eq!(pc.target(), 1.0);
        let first = pc.step(false);
        assert!(first > 0.0 && first < 1.0);
        for _ in 0..500 {
            pc.step(false);
        }
        assert!(pc.is_settled());
        assert_eq!(pc.progress(), 1.0);
    }

    #[test]
    fn reduced_motion_jumps() {
        let mut pc = PanelController::default();
        pc.next();
        assert_eq!(pc.step(true), 0.5);
        assert!(pc.is_settled());
        assert_eq!(pc.next().map(|c| c.to), Some(Panel::Contact));
        assert_eq!(pc.next(), None);
    }
}
