use showroom_core::{Panel, UiEvent};

/// Keyboard navigation between panels. Keys typed into form controls are
/// left alone.
#[inline]
pub fn key_action(key: &str, target_is_editable: bool) -> Option<UiEvent> {
    if target_is_editable {
        return None;
    }
    match key {
        "ArrowRight" | "ArrowDown" | "PageDown" => Some(UiEvent::NextPanel),
        "ArrowLeft" | "ArrowUp" | "PageUp" => Some(UiEvent::PreviousPanel),
        "Home" => Some(UiEvent::Navigate(Panel::Home)),
        "End" => Some(UiEvent::Navigate(Panel::Contact)),
        _ => None,
    }
}

#[inline]
pub fn is_editable_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_uppercase().as_str(),
        "INPUT" | "TEXTAREA" | "SELECT"
    )
}

/// Panel named by a location hash; unknown or empty hashes mean home.
#[inline]
pub fn panel_from_hash(hash: &str) -> Panel {
    Panel::from_slug(hash).unwrap_or_default()
}

#[inline]
pub fn hash_for_panel(panel: Panel) -> String {
    format!("#{}", panel.slug())
}

/// Backing-store size for a canvas laid out at `css_w` x `css_h` CSS pixels.
#[inline]
pub fn canvas_backing_size(css_w: f64, css_h: f64, pixel_ratio: f64) -> (u32, u32) {
    let w = (css_w * pixel_ratio).floor().max(1.0) as u32;
    let h = (css_h * pixel_ratio).floor().max(1.0) as u32;
    (w, h)
}

/// Collapses bursts of resize events into one handling per animation frame.
#[derive(Default, Clone, Copy, Debug)]
pub struct ResizeCoalescer {
    pending: bool,
}

impl ResizeCoalescer {
    /// Record a resize; true when a frame callback must be scheduled.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending resize, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Latch for teardown paths that must run exactly once.
#[derive(Default, Clone, Copy, Debug)]
pub struct Once {
    done: bool,
}

impl Once {
    pub fn first(&mut self) -> bool {
        !std::mem::replace(&mut self.done, true)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Whether a failed submission should offer the `mailto:` link. Only relay
/// or transport failures do; validation errors are for the user to fix.
#[inline]
pub fn offers_mail_fallback(error: Option<&str>) -> bool {
    matches!(error, Some("send_failed" | "missing_smtp_credentials"))
}

/// User-facing text for a contact relay outcome.
#[inline]
pub fn contact_status_text(error: Option<&str>) -> &'static str {
    match error {
        None => "Thanks! Your message is on its way.",
        Some("missing_required_fields") => "Please fill in your name, email and message.",
        Some("invalid_email") => "That email address doesn't look right.",
        Some(_) => "Sending failed. You can email us directly instead.",
    }
}
