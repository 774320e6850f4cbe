use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

///
/// Feature
///
/// Boolean switches of the persistence module. Each feature has a stable
/// bit position and a default state.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Load uninitialized lazy values during serialization instead of
    /// writing them as null / omitting them.
    #[display("force_lazy_loading")]
    ForceLazyLoading,

    /// Exclude fields carrying the transient marker from output.
    #[display("use_transient_marker")]
    UseTransientMarker,

    /// Treat a collection property as lazy only when it carries an explicit
    /// lazy marker.
    #[display("require_explicit_lazy_marker")]
    RequireExplicitLazyMarker,
}

impl Feature {
    pub const ALL: [Self; 3] = [
        Self::ForceLazyLoading,
        Self::UseTransientMarker,
        Self::RequireExplicitLazyMarker,
    ];

    #[must_use]
    pub const fn enabled_by_default(self) -> bool {
        match self {
            Self::ForceLazyLoading | Self::RequireExplicitLazyMarker => false,
            Self::UseTransientMarker => true,
        }
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        1 << (self as u32)
    }

    #[must_use]
    pub const fn enabled_in(self, flags: Features) -> bool {
        flags.0 & self.mask() != 0
    }

    /// Features enabled by default.
    #[must_use]
    pub const fn collect_defaults() -> Features {
        let mut bits = 0;
        let mut idx = 0;
        while idx < Self::ALL.len() {
            let feature = Self::ALL[idx];
            if feature.enabled_by_default() {
                bits |= feature.mask();
            }
            idx += 1;
        }

        Features(bits)
    }
}

///
/// Features
/// Immutable snapshot of feature switches.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Features(u32);

impl Features {
    const KNOWN: u32 = Feature::ForceLazyLoading.mask()
        | Feature::UseTransientMarker.mask()
        | Feature::RequireExplicitLazyMarker.mask();

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn defaults() -> Self {
        Feature::collect_defaults()
    }

    /// Unknown bits are dropped.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::KNOWN)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, feature: Feature) -> bool {
        feature.enabled_in(self)
    }

    #[must_use]
    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.mask())
    }

    #[must_use]
    pub const fn without(self, feature: Feature) -> Self {
        Self(self.0 & !feature.mask())
    }

    #[must_use]
    pub const fn set(self, feature: Feature, state: bool) -> Self {
        if state {
            self.with(feature)
        } else {
            self.without(feature)
        }
    }

    #[must_use]
    pub const fn force_lazy_loading(self) -> bool {
        self.contains(Feature::ForceLazyLoading)
    }

    #[must_use]
    pub const fn use_transient_marker(self) -> bool {
        self.contains(Feature::UseTransientMarker)
    }

    #[must_use]
    pub const fn require_explicit_lazy_marker(self) -> bool {
        self.contains(Feature::RequireExplicitLazyMarker)
    }

    /// Enabled features in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL
            .into_iter()
            .filter(move |feature| self.contains(*feature))
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FromIterator<Feature> for Features {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

///
/// FeatureHandle
///
/// Shared, atomically updated feature state. The module and every policy
/// it hands out hold clones of the same handle, so a change is seen by all
/// of them on their next read.
///

#[derive(Clone, Debug)]
pub struct FeatureHandle(Arc<AtomicU32>);

impl FeatureHandle {
    #[must_use]
    pub fn new(features: Features) -> Self {
        Self(Arc::new(AtomicU32::new(features.bits())))
    }

    /// Current snapshot.
    #[must_use]
    pub fn load(&self) -> Features {
        Features::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, features: Features) {
        self.0.store(features.bits(), Ordering::Release);
    }

    /// Apply `f` atomically and return the new snapshot.
    pub fn update(&self, f: impl Fn(Features) -> Features) -> Features {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            let next = f(Features::from_bits(current));
            match self.0.compare_exchange_weak(
                current,
                next.bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return next,
                Err(actual) => current = actual,
            }
        }
    }

    /// True when both handles share the same state.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for FeatureHandle {
    fn default() -> Self {
        Self::new(Features::defaults())
    }
}
