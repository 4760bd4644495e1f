use super::Color;

/// One of the 24 cells on the board. Invariant: count = 0 iff color = None.
/// A point holding exactly one checker is a blot and can be hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    color: Option<Color>,
    count: u8,
}

impl Point {
    pub fn color(&self) -> Option<Color> {
        self.color
    }
    pub fn count(&self) -> u8 {
        self.count
    }
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
    pub fn is_blot(&self) -> bool {
        self.count == 1
    }
    /// Whether this point holds at least one checker of the given color.
    pub fn holds(&self, color: Color) -> bool {
        self.color == Some(color)
    }
    /// A checker of `color` may land here: empty, already owned,
    /// or a lone opponent blot (which would be hit).
    pub fn is_open_for(&self, color: Color) -> bool {
        self.is_empty() || self.holds(color) || self.is_blot()
    }
    /// Landing here hits an opponent blot.
    pub fn is_hit_by(&self, color: Color) -> bool {
        self.is_blot() && self.color == Some(color.opponent())
    }

    pub fn push(&mut self, color: Color) {
        assert!(
            self.is_empty() || self.holds(color),
            "stacking onto opponent point"
        );
        self.color = Some(color);
        self.count += 1;
    }
    pub fn pop(&mut self) -> Color {
        let color = self.color.expect("pop from empty point");
        self.count -= 1;
        if self.count == 0 {
            self.color = None;
        }
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_color_invariant() {
        let mut point = Point::default();
        assert!(point.is_empty());
        assert_eq!(point.color(), None);
        point.push(Color::White);
        assert!(point.is_blot());
        assert_eq!(point.color(), Some(Color::White));
        assert_eq!(point.pop(), Color::White);
        assert!(point.is_empty());
        assert_eq!(point.color(), None);
    }

    #[test]
    fn openness() {
        let mut point = Point::default();
        assert!(point.is_open_for(Color::Red));
        point.push(Color::White);
        assert!(point.is_open_for(Color::Red));
        assert!(point.is_hit_by(Color::Red));
        point.push(Color::White);
        assert!(!point.is_open_for(Color::Red));
        assert!(point.is_open_for(Color::White));
    }

    #[test]
    #[should_panic]
    fn stacking_on_opponent_panics() {
        let mut point = Point::default();
        point.push(Color::White);
        point.push(Color::White);
        point.push(Color::Red);
    }
}
