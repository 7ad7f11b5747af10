//! Pick the single button release handled this tick.

use crate::platform::Platform;
use crate::ui::buttons::Button;

/// START first, then the first released of A, B, X, Y.
///
/// Simultaneous releases are not merged; the rest are dropped.
pub fn released_button<P>(platform: &P) -> Option<Button>
where
    P: Platform + ?Sized,
{
    if platform.is_button_released(Button::Start) {
        return Some(Button::Start);
    }
    Button::FACE
        .into_iter()
        .find(|&button| platform.is_button_released(button))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessPlatform;

    #[test]
    fn nothing_released() {
        let mut p = HeadlessPlatform::new();
        p.poll_input();
        assert_eq!(released_button(&p), None);
    }

    #[test]
    fn reports_the_released_button() {
        for button in [Button::A, Button::B, Button::X, Button::Y, Button::Start] {
            let mut p = HeadlessPlatform::new().release_at(1, button);
            p.poll_input();
            assert_eq!(released_button(&p), Some(button));
        }
    }
}
