//! Fixed-capacity ordered filter chain.

use heapless::Vec;

use crate::fast::{FastFilter, FilterKind};
use crate::kernels::PixelFilter;
use crate::{FilterSettings, Geometry};

/// Default chain capacity.
pub const MAX_FILTERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot<F> {
    filter: F,
    enabled: bool,
}

/// Up to `N` filters run in insertion order.
///
/// Storage is inline, so building and running a chain never allocates.
/// Disabled slots keep their position and are skipped by [`process`].
///
/// # Example
///
/// ```
/// use pixel_filters::{FilterChain, FastFilter, FilterKind, FilterSettings, Geometry};
///
/// let settings = FilterSettings::default();
/// let mut chain: FilterChain<FastFilter> = FilterChain::new();
/// chain.add(FastFilter::from_kind(FilterKind::Sepia, &settings));
/// chain.add(FastFilter::from_kind(FilterKind::Vignette, &settings));
///
/// let mut line = [0xFFFFu16; 160];
/// chain.process(&mut line, Geometry::scanline(160, 0, 128));
/// ```
///
/// [`process`]: FilterChain::process
#[derive(Debug, Clone)]
pub struct FilterChain<F, const N: usize = MAX_FILTERS> {
    slots: Vec<Slot<F>, N>,
}

impl<F: PixelFilter, const N: usize> FilterChain<F, N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append an enabled filter. Returns `false`, leaving the chain
    /// unchanged, when it is full.
    pub fn add(&mut self, filter: F) -> bool {
        self.push(filter, true)
    }

    /// Append a filter that starts disabled.
    pub fn add_disabled(&mut self, filter: F) -> bool {
        self.push(filter, false)
    }

    fn push(&mut self, filter: F, enabled: bool) -> bool {
        self.slots.push(Slot { filter, enabled }).is_ok()
    }

    /// Run every enabled filter over `pixels`, in order.
    pub fn process(&mut self, pixels: &mut [u16], geometry: Geometry) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            slot.filter.apply(pixels, geometry);
        }
    }

    /// Flip the first filter called `name`; `false` if there is none.
    pub fn toggle(&mut self, name: &str) -> bool {
        match self.slots.iter_mut().find(|s| s.filter.name() == name) {
            Some(slot) => {
                slot.enabled = !slot.enabled;
                true
            }
            None => false,
        }
    }

    /// Enable or disable the filter at `index`; out of range is ignored.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.enabled = enabled;
        }
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.enabled)
    }

    pub fn name(&self, index: usize) -> Option<&'static str> {
        self.slots.get(index).map(|s| s.filter.name())
    }

    /// The first filter called `name`, for parameter changes in place.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut F> {
        self.slots
            .iter_mut()
            .find(|s| s.filter.name() == name)
            .map(|s| &mut s.filter)
    }

    /// Filters in order with their enabled flag.
    pub fn iter(&self) -> impl Iterator<Item = (&F, bool)> {
        self.slots.iter().map(|s| (&s.filter, s.enabled))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of enabled slots.
    pub fn enabled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.enabled).count()
    }

    /// Drop every filter in the chain.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<F: PixelFilter, const N: usize> Default for FilterChain<F, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FilterChain<FastFilter, N> {
    /// A chain holding every [`FilterKind`], all disabled.
    ///
    /// Kinds past the capacity are left out.
    pub fn with_all_kinds(settings: &FilterSettings) -> Self {
        let mut chain = Self::new();
        for kind in FilterKind::ALL {
            if !chain.add_disabled(FastFilter::from_kind(kind, settings)) {
                break;
            }
        }
        chain
    }

    /// A chain running `kinds` in order, all enabled.
    pub fn from_kinds(kinds: &[FilterKind], settings: &FilterSettings) -> Self {
        let mut chain = Self::new();
        for &kind in kinds {
            if !chain.add(FastFilter::from_kind(kind, settings)) {
                break;
            }
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{Filter, Grayscale, Vignette};
    use pretty_assertions::assert_eq;

    struct Counter {
        name: &'static str,
        calls: usize,
    }

    impl PixelFilter for Counter {
        fn name(&self) -> &'static str {
            self.name
        }

        fn apply(&mut self, pixels: &mut [u16], _geometry: Geometry) {
            self.calls += 1;
            for p in pixels.iter_mut() {
                *p = p.wrapping_add(1);
            }
        }
    }

    fn counter(name: &'static str) -> Counter {
        Counter { name, calls: 0 }
    }

    #[test]
    fn test_add_until_full() {
        let mut chain: FilterChain<Counter, 2> = FilterChain::new();
        assert!(chain.add(counter("a")));
        assert!(chain.add(counter("b")));
        assert!(!chain.add(counter("c")));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.name(1), Some("b"));
        assert_eq!(chain.name(2), None);
    }

    #[test]
    fn test_default_capacity() {
        let chain: FilterChain<Filter> = FilterChain::new();
        assert_eq!(chain.capacity(), MAX_FILTERS);
        assert!(chain.is_empty());
    }

    #[test]
    fn test_disabled_filters_skipped() {
        let mut chain: FilterChain<Counter> = FilterChain::new();
        chain.add(counter("a"));
        chain.add(counter("b"));
        chain.set_enabled(0, false);

        let mut pixels = [0u16; 4];
        chain.process(&mut pixels, Geometry::frame(4, 1));
        assert_eq!(pixels, [1; 4]);
        assert!(!chain.is_enabled(0));
        assert!(chain.is_enabled(1));
        assert_eq!(chain.get_mut("a").map(|c| c.calls), Some(0));
        assert_eq!(chain.get_mut("b").map(|c| c.calls), Some(1));
    }

    #[test]
    fn test_toggle_first_match() {
        let mut chain: FilterChain<Counter> = FilterChain::new();
        chain.add(counter("a"));
        chain.add(counter("a"));
        assert!(chain.toggle("a"));
        assert!(!chain.is_enabled(0));
        assert!(chain.is_enabled(1));
        assert!(!chain.toggle("missing"));
    }

    #[test]
    fn test_out_of_range_index() {
        let mut chain: FilterChain<Counter> = FilterChain::new();
        chain.set_enabled(5, true);
        assert!(!chain.is_enabled(5));
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_clear_empties() {
        let mut chain: FilterChain<Filter> = FilterChain::new();
        chain.add(Filter::Grayscale(Grayscale));
        chain.add(Filter::Vignette(Vignette::default()));
        chain.clear();
        assert_eq!(chain.len(), 0);
        let mut pixels = [0xF800u16; 4];
        chain.process(&mut pixels, Geometry::frame(2, 2));
        assert_eq!(pixels, [0xF800; 4]);
    }

    #[test]
    fn test_with_all_kinds_starts_disabled() {
        let chain: FilterChain<FastFilter> = FilterChain::with_all_kinds(&FilterSettings::default());
        assert_eq!(chain.len(), FilterKind::ALL.len());
        assert_eq!(chain.enabled_count(), 0);
        let names: std::vec::Vec<_> = chain.iter().map(|(f, _)| f.name()).collect();
        assert_eq!(names[0], "Grayscale");
        assert_eq!(names[7], "Grain");
    }

    #[test]
    fn test_with_all_kinds_truncates_to_capacity() {
        let chain: FilterChain<FastFilter, 3> = FilterChain::with_all_kinds(&FilterSettings::default());
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_get_mut_adjusts_parameters() {
        let mut chain: FilterChain<FastFilter> =
            FilterChain::from_kinds(&[FilterKind::Vintage], &FilterSettings::default());
        if let Some(FastFilter::Vintage { warmth, .. }) = chain.get_mut("Vintage") {
            *warmth = 0;
        }
        assert_eq!(
            chain.iter().next().map(|(f, _)| f.clone()),
            Some(FastFilter::Vintage { warmth: 0, fade: 20 })
        );
    }
}
