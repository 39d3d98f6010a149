//! Cumulative resource tracks and their typed registry.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::problem::{NodeIndex, ProblemGraph};

use super::error::UnknownDimensionName;

/// Identifier of every resource track the model knows about.
///
/// Dimensions are resolved through this enum once, at construction; nothing
/// downstream looks a dimension up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DimensionId {
    /// Elapsed time since the route started.
    GlobalTime,
    /// Distance flown since the route started.
    GlobalDistance,
    /// Elapsed time since the last reload.
    ReloadTime,
    /// Distance flown since the last reload.
    ReloadDistance,
    /// Passenger weight on board.
    Load,
    /// Landings since the last reload.
    Landing,
    /// Number of nodes visited so far.
    Visits,
}

impl DimensionId {
    /// Number of identifiers.
    pub const COUNT: usize = 7;

    /// Every identifier in registration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::GlobalTime,
        Self::GlobalDistance,
        Self::ReloadTime,
        Self::ReloadDistance,
        Self::Load,
        Self::Landing,
        Self::Visits,
    ];

    /// Stable dimension name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GlobalTime => "GlobalTime",
            Self::GlobalDistance => "GlobalDistance",
            Self::ReloadTime => "TimeReload",
            Self::ReloadDistance => "DistanceReload",
            Self::Load => "Load",
            Self::Landing => "LandingReload",
            Self::Visits => "__visited__",
        }
    }

    /// Kebab-case key accepted on the command line and in configuration.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::GlobalTime => "global-time",
            Self::GlobalDistance => "global-distance",
            Self::ReloadTime => "reload-time",
            Self::ReloadDistance => "reload-distance",
            Self::Load => "load",
            Self::Landing => "landing",
            Self::Visits => "visits",
        }
    }

    /// Column heading used in route tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GlobalTime => "global time",
            Self::GlobalDistance => "global distance",
            Self::ReloadTime => "reload time",
            Self::ReloadDistance => "reload distance",
            Self::Load => "load",
            Self::Landing => "landing",
            Self::Visits => "visits",
        }
    }

    /// Whether a reload empties this track.
    #[must_use]
    pub const fn is_reload_scoped(self) -> bool {
        matches!(
            self,
            Self::ReloadTime | Self::ReloadDistance | Self::Landing
        )
    }

    pub(crate) const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DimensionId {
    type Err = UnknownDimensionName;

    /// Parse a kebab-case key or a dimension name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.key() == s || id.name() == s)
            .ok_or_else(|| UnknownDimensionName(s.to_owned()))
    }
}

/// Change applied to a cumulative value when travelling one arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transit {
    /// Add this amount.
    Step(i64),
    /// Reload: the next cumulative value restarts from the lower bound.
    Reset,
}

/// Transit depending on both ends of an arc.
pub type BinaryTransit = fn(&ProblemGraph, NodeIndex, NodeIndex) -> Option<Transit>;

/// Transit depending only on the node being left.
pub type UnaryTransit = fn(&ProblemGraph, NodeIndex) -> Option<Transit>;

/// How a dimension accumulates along an arc.
///
/// Rules are pure functions of the read-only graph and the arc's end points;
/// `None` means the rule is undefined for that arc.
#[derive(Debug, Clone, Copy)]
pub enum TransitRule {
    /// Evaluated on `(from, to)`.
    Binary(BinaryTransit),
    /// Evaluated on `from`.
    Unary(UnaryTransit),
    /// Same step on every arc.
    Constant(i64),
}

impl TransitRule {
    /// Evaluate the rule on the arc `from -> to`.
    #[must_use]
    pub fn evaluate(
        &self,
        graph: &ProblemGraph,
        from: NodeIndex,
        to: NodeIndex,
    ) -> Option<Transit> {
        match self {
            Self::Binary(rule) => rule(graph, from, to),
            Self::Unary(rule) => rule(graph, from),
            Self::Constant(step) => Some(Transit::Step(*step)),
        }
    }
}

/// Position on a route a soft bound is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VisitRef {
    /// A visit of a graph node, whichever vehicle makes it.
    Node(NodeIndex),
    /// The depot-return of one vehicle.
    VehicleEnd(usize),
}

/// Payload still available at a visit, derived from the aircraft figures.
///
/// The limit is `MTOW - BOW - full tank - (load - allowance) + fuel burnt`,
/// capped by the cabin ceiling. `allowance` is the weight leaving the
/// aircraft at the node (`min(0, balance * passenger weight)`), and the fuel
/// burnt is the reload time so far times the consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLimit {
    /// Maximum takeoff weight.
    pub max_takeoff_weight: i64,
    /// Basic operational weight.
    pub basic_operational_weight: i64,
    /// Fuel weight with full tanks.
    pub full_tank: i64,
    /// Fuel burnt per time unit.
    pub consumption: i64,
    /// Weight disembarking at the node, zero or negative.
    pub allowance: i64,
    /// Cabin-imposed payload ceiling.
    pub passenger_ceiling: i64,
}

impl PayloadLimit {
    /// Resolve the limit for a visit with the given load and reload time.
    #[must_use]
    pub fn resolve(&self, load: i64, reload_time: i64) -> i64 {
        let fuel_burnt = reload_time.saturating_mul(self.consumption);
        let payload = self
            .max_takeoff_weight
            .saturating_sub(self.basic_operational_weight)
            .saturating_sub(self.full_tank)
            .saturating_sub(load.saturating_sub(self.allowance))
            .saturating_add(fuel_burnt);
        payload.min(self.passenger_ceiling)
    }
}

/// Upper limit of a soft bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundLimit {
    /// A constant ceiling.
    Fixed(i64),
    /// The payload available at the visit.
    Payload(PayloadLimit),
}

/// Upper bound whose excess is charged rather than forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftUpperBound {
    /// Ceiling the cumulative value should stay under.
    pub limit: BoundLimit,
    /// Cost per unit of excess.
    pub penalty: i64,
}

/// One cumulative resource track.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub(crate) id: DimensionId,
    pub(crate) rule: TransitRule,
    pub(crate) lower: i64,
    pub(crate) upper: i64,
    pub(crate) slack_max: i64,
    pub(crate) start_at_zero: bool,
    pub(crate) vehicle_capacities: Vec<i64>,
    pub(crate) span_cost: i64,
    pub(crate) soft_upper_bounds: BTreeMap<VisitRef, SoftUpperBound>,
    pub(crate) pinned_slack: BTreeSet<NodeIndex>,
}

impl Dimension {
    /// Identifier of the track.
    #[must_use]
    pub const fn id(&self) -> DimensionId {
        self.id
    }

    /// Accumulation rule.
    #[must_use]
    pub const fn rule(&self) -> TransitRule {
        self.rule
    }

    /// Smallest admissible cumulative value.
    #[must_use]
    pub const fn lower(&self) -> i64 {
        self.lower
    }

    /// Largest admissible cumulative value over all vehicles.
    #[must_use]
    pub const fn upper(&self) -> i64 {
        self.upper
    }

    /// Largest admissible cumulative value for one vehicle.
    #[must_use]
    pub fn capacity(&self, vehicle: usize) -> i64 {
        self.vehicle_capacities
            .get(vehicle)
            .map_or(self.upper, |capacity| (*capacity).min(self.upper))
    }

    /// Cumulative value at a route start.
    #[must_use]
    pub const fn start_cumul(&self) -> i64 {
        if self.start_at_zero { 0 } else { self.lower }
    }

    /// Slack a visit of `node` may absorb; zero where slack is pinned.
    #[must_use]
    pub fn slack_max_at(&self, node: NodeIndex) -> i64 {
        if self.pinned_slack.contains(&node) {
            0
        } else {
            self.slack_max
        }
    }

    /// Whether slack at `node` is pinned to zero.
    #[must_use]
    pub fn is_slack_pinned(&self, node: NodeIndex) -> bool {
        self.pinned_slack.contains(&node)
    }

    /// Global span cost coefficient; zero when absent.
    #[must_use]
    pub const fn span_cost(&self) -> i64 {
        self.span_cost
    }

    /// Soft bound attached to a visit, if any.
    #[must_use]
    pub fn soft_upper_bound(&self, visit: VisitRef) -> Option<&SoftUpperBound> {
        self.soft_upper_bounds.get(&visit)
    }

    /// Transit on the arc `from -> to`.
    #[must_use]
    pub fn transit(&self, graph: &ProblemGraph, from: NodeIndex, to: NodeIndex) -> Option<Transit> {
        self.rule.evaluate(graph, from, to)
    }

    /// Cumulative value on arrival at `to`, given the value at `from` and the
    /// slack taken there.
    #[must_use]
    pub fn advance(
        &self,
        graph: &ProblemGraph,
        from: NodeIndex,
        to: NodeIndex,
        cumul: i64,
        slack: i64,
    ) -> Option<i64> {
        let base = match self.transit(graph, from, to)? {
            Transit::Step(step) => cumul.saturating_add(step),
            Transit::Reset => self.lower,
        };
        Some(base.saturating_add(slack))
    }

    pub(crate) fn set_soft_upper_bound(&mut self, visit: VisitRef, bound: SoftUpperBound) {
        self.soft_upper_bounds.insert(visit, bound);
    }

    pub(crate) fn pin_slack(&mut self, node: NodeIndex) {
        self.pinned_slack.insert(node);
    }
}

/// Registry of dimensions keyed by [`DimensionId`].
#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    slots: [Option<Dimension>; DimensionId::COUNT],
}

impl Dimensions {
    /// Borrow a registered dimension.
    #[must_use]
    pub fn get(&self, id: DimensionId) -> Option<&Dimension> {
        self.slots.get(id.slot()).and_then(Option::as_ref)
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: DimensionId) -> bool {
        self.get(id).is_some()
    }

    /// Registered dimensions in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.slots.iter().flatten()
    }

    pub(crate) fn get_mut(&mut self, id: DimensionId) -> Option<&mut Dimension> {
        self.slots.get_mut(id.slot()).and_then(Option::as_mut)
    }

    /// Store `dimension`, handing it back if its slot is taken.
    pub(crate) fn insert(&mut self, dimension: Dimension) -> Result<(), Dimension> {
        let Some(slot) = self.slots.get_mut(dimension.id.slot()) else {
            return Err(dimension);
        };
        if slot.is_some() {
            return Err(dimension);
        }
        *slot = Some(dimension);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn slots_follow_registration_order() {
        for (position, id) in DimensionId::ALL.into_iter().enumerate() {
            assert_eq!(id.slot(), position);
        }
    }

    #[rstest]
    #[case(DimensionId::ReloadTime, true)]
    #[case(DimensionId::ReloadDistance, true)]
    #[case(DimensionId::Landing, true)]
    #[case(DimensionId::GlobalTime, false)]
    #[case(DimensionId::Load, false)]
    fn reload_scope(#[case] id: DimensionId, #[case] expected: bool) {
        assert_eq!(id.is_reload_scoped(), expected);
    }

    #[rstest]
    #[case("reload-time", DimensionId::ReloadTime)]
    #[case("LandingReload", DimensionId::Landing)]
    #[case("global-distance", DimensionId::GlobalDistance)]
    fn parses_keys_and_names(#[case] input: &str, #[case] expected: DimensionId) {
        assert_eq!(input.parse::<DimensionId>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_names() {
        assert_eq!(
            "fuel".parse::<DimensionId>(),
            Err(UnknownDimensionName("fuel".to_owned()))
        );
    }

    #[rstest]
    fn payload_limit_credits_fuel_burnt_and_disembarking_weight() {
        let limit = PayloadLimit {
            max_takeoff_weight: 5_000,
            basic_operational_weight: 3_000,
            full_tank: 800,
            consumption: 4,
            allowance: -100,
            passenger_ceiling: 10_000,
        };
        // 5000 - 3000 - 800 - (300 + 100) + 50 * 4
        assert_eq!(limit.resolve(300, 50), 1_000);
    }

    #[rstest]
    fn payload_limit_is_capped_by_cabin() {
        let limit = PayloadLimit {
            max_takeoff_weight: 9_000,
            basic_operational_weight: 1_000,
            full_tank: 0,
            consumption: 0,
            allowance: 0,
            passenger_ceiling: 600,
        };
        assert_eq!(limit.resolve(0, 0), 600);
    }
}
