//! Which screen is showing.

use std::fmt;

use telshop_core::TelephoneId;

/// The screen currently rendered. Never persisted; a new session starts at
/// [`View::List`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    List,
    Detail,
    Cart,
    Order,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "catalog",
            Self::Detail => "product",
            Self::Cart => "cart",
            Self::Order => "order",
        })
    }
}

/// A navigation action triggered by the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Logo,
    CartIcon,
    OpenProduct(TelephoneId),
    Checkout,
    Back,
}

/// Holds the current [`View`] and applies navigation actions to it.
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    current: View,
    selected: Option<TelephoneId>,
}

impl ViewRouter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: View::List,
            selected: None,
        }
    }

    #[must_use]
    pub const fn current(&self) -> View {
        self.current
    }

    /// The product last opened in the detail view.
    #[must_use]
    pub const fn selected(&self) -> Option<TelephoneId> {
        self.selected
    }

    /// Apply an action and return the resulting view.
    pub fn navigate(&mut self, action: Navigation) -> View {
        self.current = match action {
            Navigation::Logo => View::List,
            Navigation::CartIcon => View::Cart,
            Navigation::OpenProduct(id) => {
                self.selected = Some(id);
                View::Detail
            }
            Navigation::Checkout => View::Order,
            Navigation::Back => match self.current {
                View::List | View::Detail | View::Cart => View::List,
                View::Order => View::Cart,
            },
        };
        self.current
    }

    /// Jump straight to a view.
    pub const fn set(&mut self, view: View) {
        self.current = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_list() {
        assert_eq!(ViewRouter::new().current(), View::List);
        assert_eq!(ViewRouter::default().current(), View::List);
    }

    #[test]
    fn test_direct_transitions() {
        let mut router = ViewRouter::new();
        assert_eq!(router.navigate(Navigation::CartIcon), View::Cart);
        assert_eq!(router.navigate(Navigation::Checkout), View::Order);
        assert_eq!(router.navigate(Navigation::Logo), View::List);
        assert_eq!(
            router.navigate(Navigation::OpenProduct(TelephoneId::new(4))),
            View::Detail
        );
        assert_eq!(router.selected(), Some(TelephoneId::new(4)));
    }

    #[test]
    fn test_back_goes_to_previous_logical_screen() {
        let mut router = ViewRouter::new();
        router.set(View::Order);
        assert_eq!(router.navigate(Navigation::Back), View::Cart);
        assert_eq!(router.navigate(Navigation::Back), View::List);
        assert_eq!(router.navigate(Navigation::Back), View::List);

        router.set(View::Detail);
        assert_eq!(router.navigate(Navigation::Back), View::List);
    }

    #[test]
    fn test_no_guards() {
        // Checkout is reachable from anywhere, even with an empty cart
        let mut router = ViewRouter::new();
        assert_eq!(router.navigate(Navigation::Checkout), View::Order);
    }
}
