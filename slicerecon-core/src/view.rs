//! Detector views and per-view containers.

use serde::{Deserialize, Serialize};

/// One of the three wire-plane projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Induction plane U.
    U,
    /// Induction plane V.
    V,
    /// Collection plane W.
    W,
}

impl View {
    /// All views, in processing order.
    pub const ALL: [View; 3] = [View::U, View::V, View::W];

    /// Lower-case single letter name.
    pub fn as_str(self) -> &'static str {
        match self {
            View::U => "u",
            View::V => "v",
            View::W => "w",
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::U => f.write_str("U"),
            View::V => f.write_str("V"),
            View::W => f.write_str("W"),
        }
    }
}

/// Fixed container with one slot per view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewMap<T> {
    /// Value for view U.
    pub u: T,
    /// Value for view V.
    pub v: T,
    /// Value for view W.
    pub w: T,
}

impl<T> ViewMap<T> {
    /// Creates a map from the three per-view values.
    pub fn new(u: T, v: T, w: T) -> Self {
        Self { u, v, w }
    }

    /// Builds a map by calling `f` for each view in order.
    pub fn from_fn(mut f: impl FnMut(View) -> T) -> Self {
        let u = f(View::U);
        let v = f(View::V);
        let w = f(View::W);
        Self { u, v, w }
    }

    /// Returns the value for `view`.
    pub fn get(&self, view: View) -> &T {
        match view {
            View::U => &self.u,
            View::V => &self.v,
            View::W => &self.w,
        }
    }

    /// Returns the value for `view` mutably.
    pub fn get_mut(&mut self, view: View) -> &mut T {
        match view {
            View::U => &mut self.u,
            View::V => &mut self.v,
            View::W => &mut self.w,
        }
    }

    /// Iterates `(view, value)` pairs in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (View, &T)> {
        View::ALL.into_iter().map(move |view| (view, self.get(view)))
    }

    /// Maps every value, keeping the view association.
    pub fn map<R>(&self, mut f: impl FnMut(View, &T) -> R) -> ViewMap<R> {
        ViewMap::from_fn(|view| f(view, self.get(view)))
    }
}

impl<T> std::ops::Index<View> for ViewMap<T> {
    type Output = T;

    fn index(&self, view: View) -> &T {
        self.get(view)
    }
}

impl<T> std::ops::IndexMut<View> for ViewMap<T> {
    fn index_mut(&mut self, view: View) -> &mut T {
        self.get_mut(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_order() {
        assert_eq!(View::ALL, [View::U, View::V, View::W]);
        assert!(View::U < View::W);
        assert_eq!(View::V.to_string(), "V");
    }

    #[test]
    fn test_view_map_access() {
        let mut map = ViewMap::new(1, 2, 3);
        map[View::V] += 10;
        assert_eq!(map[View::V], 12);

        let doubled = map.map(|_, value| value * 2);
        let collected: Vec<_> = doubled.iter().map(|(view, v)| (view, *v)).collect();
        assert_eq!(collected, vec![(View::U, 2), (View::V, 24), (View::W, 6)]);
    }
}
