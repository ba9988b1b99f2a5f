//! Runtime parameter store with change notification.
//!
//! The store is the seam between the control surface (widgets) and the
//! simulation core: widgets write named values, the engine drains the
//! change log once per tick and applies everything at the tick boundary.
//!
//! Out-of-range numeric writes are clamped to the declared range, never
//! rejected. The per-field coefficient group is scoped to the current
//! selection and replaced wholesale when the selection changes.
//!
//! # Example
//!
//! ```
//! use swirl::params::{ParamStore, ParamValue};
//!
//! let mut store = ParamStore::new();
//! store.register_float("curl_intensity", 0.0, 0.0, 0.2, 0.0001);
//! store.set("curl_intensity", ParamValue::Float(5.0));
//! assert_eq!(store.float("curl_intensity"), Some(0.2)); // clamped
//! assert_eq!(store.drain_changes(), vec!["curl_intensity".to_string()]);
//! ```

use std::collections::HashMap;

/// A current parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Bool(bool),
    /// Numeric id of the selected option.
    Select(i32),
    /// RGB, each channel in 0.0-1.0.
    Color([f32; 3]),
}

/// Declared shape of a parameter, mirroring the widget kinds the control
/// surface understands.
#[derive(Clone, Debug)]
pub enum ParamSpec {
    /// Numeric slider: range plus a step hint for the widget.
    Float { min: f32, max: f32, step: f32 },
    /// Boolean toggle.
    Toggle,
    /// Named option -> numeric id.
    Select { options: Vec<(String, i32)> },
    /// Color picker.
    Color,
}

type Callback = Box<dyn FnMut(&ParamValue)>;

struct Entry {
    name: String,
    value: ParamValue,
    spec: ParamSpec,
    callbacks: Vec<Callback>,
}

/// Name -> value mapping with ordered registration, per-change callbacks,
/// and a change log drained at tick boundaries.
#[derive(Default)]
pub struct ParamStore {
    entries: Vec<Entry>,
    indices: HashMap<String, usize>,
    changed: Vec<String>,
    coefficients: CoefficientGroup,
    restart_count: u64,
}

/// Coefficient overrides scoped to the currently selected field.
#[derive(Default)]
struct CoefficientGroup {
    selector: i32,
    names: Vec<&'static str>,
    values: Vec<f32>,
    defaults: Vec<f32>,
}

/// Change-log key used for any coefficient-group mutation.
pub const COEFFICIENTS_CHANGED: &str = "coefficients";

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a numeric parameter. The initial value is clamped like any
    /// other write.
    pub fn register_float(&mut self, name: &str, value: f32, min: f32, max: f32, step: f32) {
        self.register(
            name,
            ParamValue::Float(value.clamp(min, max)),
            ParamSpec::Float { min, max, step },
        );
    }

    /// Register a boolean toggle.
    pub fn register_toggle(&mut self, name: &str, value: bool) {
        self.register(name, ParamValue::Bool(value), ParamSpec::Toggle);
    }

    /// Register a categorical selection (named option -> numeric id).
    pub fn register_select(&mut self, name: &str, options: Vec<(String, i32)>, value: i32) {
        self.register(name, ParamValue::Select(value), ParamSpec::Select { options });
    }

    /// Register a color parameter (RGB 0-1).
    pub fn register_color(&mut self, name: &str, rgb: [f32; 3]) {
        self.register(name, ParamValue::Color(rgb), ParamSpec::Color);
    }

    fn register(&mut self, name: &str, value: ParamValue, spec: ParamSpec) {
        if let Some(&idx) = self.indices.get(name) {
            self.entries[idx].value = value;
            self.entries[idx].spec = spec;
        } else {
            let idx = self.entries.len();
            self.entries.push(Entry {
                name: name.to_string(),
                value,
                spec,
                callbacks: Vec::new(),
            });
            self.indices.insert(name.to_string(), idx);
        }
    }

    /// Write a parameter. Numeric values are clamped to the declared
    /// range; the change is logged and callbacks fire immediately.
    /// Writes to unregistered names are ignored (logged as unexpected).
    pub fn set(&mut self, name: &str, value: ParamValue) {
        let Some(&idx) = self.indices.get(name) else {
            eprintln!("Write to unregistered parameter '{}'", name);
            return;
        };
        let entry = &mut self.entries[idx];

        let value = match (&entry.spec, value) {
            (ParamSpec::Float { min, max, .. }, ParamValue::Float(v)) => {
                ParamValue::Float(v.clamp(*min, *max))
            }
            (ParamSpec::Color, ParamValue::Color(rgb)) => {
                ParamValue::Color(rgb.map(|c| c.clamp(0.0, 1.0)))
            }
            (_, v) => v,
        };

        if entry.value == value {
            return;
        }
        entry.value = value;
        for cb in &mut entry.callbacks {
            cb(&value);
        }
        if !self.changed.iter().any(|n| n == name) {
            self.changed.push(name.to_string());
        }
    }

    /// Register a callback invoked on every change to `name`.
    pub fn on_change<F: FnMut(&ParamValue) + 'static>(&mut self, name: &str, cb: F) {
        if let Some(&idx) = self.indices.get(name) {
            self.entries[idx].callbacks.push(Box::new(cb));
        }
    }

    pub fn value(&self, name: &str) -> Option<ParamValue> {
        self.indices.get(name).map(|&idx| self.entries[idx].value)
    }

    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.indices.get(name).map(|&idx| &self.entries[idx].spec)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.value(name) {
            Some(ParamValue::Float(v)) => Some(v),
            _ => None,
        }
    }

    pub fn toggle(&self, name: &str) -> Option<bool> {
        match self.value(name) {
            Some(ParamValue::Bool(v)) => Some(v),
            _ => None,
        }
    }

    pub fn select(&self, name: &str) -> Option<i32> {
        match self.value(name) {
            Some(ParamValue::Select(v)) => Some(v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<[f32; 3]> {
        match self.value(name) {
            Some(ParamValue::Color(v)) => Some(v),
            _ => None,
        }
    }

    /// Names changed since the last drain, in first-write order. The
    /// engine calls this once at each tick boundary.
    pub fn drain_changes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.changed)
    }

    // ========== Restart trigger ==========

    /// Momentary action: force the scheduler back to `Primed` without
    /// changing selection. Monotonic so the engine can detect it by
    /// comparing counts across tick boundaries.
    pub fn trigger_restart(&mut self) {
        self.restart_count += 1;
    }

    pub fn restart_count(&self) -> u64 {
        self.restart_count
    }

    // ========== Per-field coefficient group ==========

    /// Replace the coefficient group wholesale for a new selection.
    ///
    /// Overrides from the previous selection are discarded, not merged.
    pub fn load_coefficients(&mut self, selector: i32, defaults: &[(&'static str, f32)]) {
        self.coefficients = CoefficientGroup {
            selector,
            names: defaults.iter().map(|(n, _)| *n).collect(),
            values: defaults.iter().map(|(_, v)| *v).collect(),
            defaults: defaults.iter().map(|(_, v)| *v).collect(),
        };
        if !self.changed.iter().any(|n| n == COEFFICIENTS_CHANGED) {
            self.changed.push(COEFFICIENTS_CHANGED.to_string());
        }
    }

    /// Override one coefficient of the current group by slot index.
    /// Coefficients declare no range, so no clamping applies.
    pub fn set_coefficient(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.coefficients.values.get_mut(index) {
            if *slot != value {
                *slot = value;
                if !self.changed.iter().any(|n| n == COEFFICIENTS_CHANGED) {
                    self.changed.push(COEFFICIENTS_CHANGED.to_string());
                }
            }
        }
    }

    /// Restore the current group to its catalog defaults.
    pub fn reset_coefficients(&mut self) {
        if self.coefficients.values != self.coefficients.defaults {
            self.coefficients.values = self.coefficients.defaults.clone();
            if !self.changed.iter().any(|n| n == COEFFICIENTS_CHANGED) {
                self.changed.push(COEFFICIENTS_CHANGED.to_string());
            }
        }
    }

    /// Selector the current coefficient group belongs to.
    pub fn coefficient_selector(&self) -> i32 {
        self.coefficients.selector
    }

    pub fn coefficient_names(&self) -> &[&'static str] {
        &self.coefficients.names
    }

    pub fn coefficient_values(&self) -> &[f32] {
        &self.coefficients.values
    }

    /// Iterate registered parameters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue, &ParamSpec)> {
        self.entries.iter().map(|e| (e.name.as_str(), &e.value, &e.spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_float_clamping() {
        let mut store = ParamStore::new();
        store.register_float("x", 0.5, 0.0, 1.0, 0.1);

        store.set("x", ParamValue::Float(2.0));
        assert_eq!(store.float("x"), Some(1.0));

        store.set("x", ParamValue::Float(-3.0));
        assert_eq!(store.float("x"), Some(0.0));
    }

    #[test]
    fn test_color_clamping() {
        let mut store = ParamStore::new();
        store.register_color("tint", [0.2, 0.2, 0.2]);
        store.set("tint", ParamValue::Color([1.5, -0.5, 0.5]));
        assert_eq!(store.color("tint"), Some([1.0, 0.0, 0.5]));
    }

    #[test]
    fn test_change_log_drains() {
        let mut store = ParamStore::new();
        store.register_float("a", 0.0, 0.0, 1.0, 0.1);
        store.register_toggle("b", false);

        store.set("a", ParamValue::Float(0.3));
        store.set("b", ParamValue::Bool(true));
        store.set("a", ParamValue::Float(0.6)); // no duplicate entry

        assert_eq!(store.drain_changes(), vec!["a".to_string(), "b".to_string()]);
        assert!(store.drain_changes().is_empty());
    }

    #[test]
    fn test_unchanged_write_is_not_logged() {
        let mut store = ParamStore::new();
        store.register_toggle("pause", false);
        store.set("pause", ParamValue::Bool(false));
        assert!(store.drain_changes().is_empty());
    }

    #[test]
    fn test_callbacks_fire_on_change() {
        let mut store = ParamStore::new();
        store.register_float("speed", 1.0, 0.0, 10.0, 0.1);

        let seen = Rc::new(Cell::new(0.0f32));
        let seen_cb = seen.clone();
        store.on_change("speed", move |v| {
            if let ParamValue::Float(f) = v {
                seen_cb.set(*f);
            }
        });

        store.set("speed", ParamValue::Float(4.0));
        assert_eq!(seen.get(), 4.0);
    }

    #[test]
    fn test_restart_counter_is_monotonic() {
        let mut store = ParamStore::new();
        assert_eq!(store.restart_count(), 0);
        store.trigger_restart();
        store.trigger_restart();
        assert_eq!(store.restart_count(), 2);
    }

    #[test]
    fn test_coefficient_group_wholesale_replace() {
        let mut store = ParamStore::new();
        store.load_coefficients(0, &[("a", 5.0), ("b", 14.0)]);
        store.set_coefficient(0, 9.0);
        assert_eq!(store.coefficient_values(), &[9.0, 14.0]);

        // Selection change replaces the group; the old override is gone
        store.load_coefficients(2, &[("b", 0.19)]);
        assert_eq!(store.coefficient_selector(), 2);
        assert_eq!(store.coefficient_values(), &[0.19]);
        assert_eq!(store.coefficient_names(), &["b"]);
    }

    #[test]
    fn test_coefficient_reset() {
        let mut store = ParamStore::new();
        store.load_coefficients(0, &[("a", 5.0), ("b", 14.0), ("c", 1.33333)]);
        store.set_coefficient(2, 3.0);
        store.reset_coefficients();
        assert_eq!(store.coefficient_values(), &[5.0, 14.0, 1.33333]);
    }

    #[test]
    fn test_coefficient_changes_logged_once() {
        let mut store = ParamStore::new();
        store.load_coefficients(0, &[("a", 5.0)]);
        store.drain_changes();

        store.set_coefficient(0, 1.0);
        store.set_coefficient(0, 2.0);
        assert_eq!(store.drain_changes(), vec![COEFFICIENTS_CHANGED.to_string()]);
    }

    #[test]
    fn test_unregistered_write_is_ignored() {
        let mut store = ParamStore::new();
        store.set("nope", ParamValue::Float(1.0));
        assert!(store.drain_changes().is_empty());
    }
}
