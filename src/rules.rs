//! Moped routing policy and its compilation to engine parameters.
//!
//! The policy is a fixed catalog of conditional weight adjustments sent to
//! the routing engine as an indexed custom model. Ordering is load-bearing:
//! the engine evaluates rules in index order, so the legal/safety blocks must
//! sit at the lowest indices for every mode. The compiler appends rules to an
//! ordered list and assigns indices at emission time, which makes "blocks
//! first" a structural property instead of bookkeeping.

use std::fmt;

/// Mopeds in the Netherlands are limited to 45 km/h.
pub const MOPED_SPEED_LIMIT_KMH: u32 = 45;

/// Road classes referenced by the policy, as named in the engine's data
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadClass {
    Primary,
    Secondary,
    Tertiary,
    Motorway,
    Trunk,
    Residential,
    Cycleway,
}

impl RoadClass {
    fn as_str(self) -> &'static str {
        match self {
            RoadClass::Primary => "PRIMARY",
            RoadClass::Secondary => "SECONDARY",
            RoadClass::Tertiary => "TERTIARY",
            RoadClass::Motorway => "MOTORWAY",
            RoadClass::Trunk => "TRUNK",
            RoadClass::Residential => "RESIDENTIAL",
            RoadClass::Cycleway => "CYCLEWAY",
        }
    }
}

/// Dutch traffic signs the policy reacts to.
///
/// C-series signs prohibit entry for (at least) mopeds; G12a marks a
/// moped-and-bicycle path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficSign {
    C1,
    C2,
    C5,
    C7,
    C12,
    G12a,
}

impl TrafficSign {
    fn as_str(self) -> &'static str {
        match self {
            TrafficSign::C1 => "NL:C1",
            TrafficSign::C2 => "NL:C2",
            TrafficSign::C5 => "NL:C5",
            TrafficSign::C7 => "NL:C7",
            TrafficSign::C12 => "NL:C12",
            TrafficSign::G12a => "NL:G12a",
        }
    }
}

/// Access tags that exclude mopeds when tagged `no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Moped,
    MotorVehicle,
    Vehicle,
}

impl AccessMode {
    fn as_str(self) -> &'static str {
        match self {
            AccessMode::Moped => "moped",
            AccessMode::MotorVehicle => "motor_vehicle",
            AccessMode::Vehicle => "vehicle",
        }
    }
}

/// Values of the `cycleway_moped` attribute the policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclewayMoped {
    Designated,
    Yes,
}

impl CyclewayMoped {
    fn as_str(self) -> &'static str {
        match self {
            CyclewayMoped::Designated => "designated",
            CyclewayMoped::Yes => "yes",
        }
    }
}

/// A predicate over road attributes.
///
/// The engine consumes these as strings in its own condition grammar; keeping
/// them as an enum until the wire boundary means a typo cannot silently turn
/// a rule into a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Matches every segment.
    Always,
    RoadClass(RoadClass),
    /// `<mode> == no`
    AccessNo(AccessMode),
    /// `max_speed > <kmh>`
    MaxSpeedAbove(u32),
    /// `zone_maxspeed > <kmh>`
    ZoneMaxSpeedAbove(u32),
    /// `zone_maxspeed > 0 && zone_maxspeed < <kmh>`
    ZoneMaxSpeedBelow(u32),
    TrafficSign(TrafficSign),
    CyclewayMoped(CyclewayMoped),
    /// Disjunction, rendered with ` || `.
    AnyOf(Vec<Condition>),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => write!(f, "true"),
            Condition::RoadClass(class) => write!(f, "road_class == {}", class.as_str()),
            Condition::AccessNo(mode) => write!(f, "{} == no", mode.as_str()),
            Condition::MaxSpeedAbove(kmh) => write!(f, "max_speed > {kmh}"),
            Condition::ZoneMaxSpeedAbove(kmh) => write!(f, "zone_maxspeed > {kmh}"),
            Condition::ZoneMaxSpeedBelow(kmh) => {
                write!(f, "zone_maxspeed > 0 && zone_maxspeed < {kmh}")
            }
            Condition::TrafficSign(sign) => write!(f, "traffic_sign == '{}'", sign.as_str()),
            Condition::CyclewayMoped(value) => write!(f, "cycleway_moped == {}", value.as_str()),
            Condition::AnyOf(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " || ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}

/// One line of routing policy: when `condition` holds, scale the segment's
/// selection priority and its distance cost.
///
/// A priority of 0 excludes the segment; above 1 prefers it; between 0 and 1
/// discourages it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRule {
    pub condition: Condition,
    pub priority: f64,
    pub distance_influence: f64,
}

impl WeightRule {
    /// Forbidden outright: zero priority plus a 1000x distance cost, so the
    /// segment loses even when the engine relaxes priorities.
    fn block(condition: Condition) -> Self {
        Self {
            condition,
            priority: 0.0,
            distance_influence: 1000.0,
        }
    }

    /// Adjusts selection priority only.
    fn priority(condition: Condition, factor: f64) -> Self {
        Self {
            condition,
            priority: factor,
            distance_influence: 1.0,
        }
    }

    /// Adjusts both priority and distance cost.
    fn prefer(condition: Condition, priority: f64, distance_influence: f64) -> Self {
        Self {
            condition,
            priority,
            distance_influence,
        }
    }

    /// Unconditional distance weighting for the route character.
    fn distance_weight(factor: f64) -> Self {
        Self {
            condition: Condition::Always,
            priority: 1.0,
            distance_influence: factor,
        }
    }
}

/// A speed cap applied when `condition` holds.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRule {
    pub condition: Condition,
    pub limit: SpeedLimit,
}

/// What a [`SpeedRule`] caps to: a fixed value or the zone limit itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedLimit {
    Kmh(u32),
    ZoneMaxSpeed,
}

impl fmt::Display for SpeedLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedLimit::Kmh(kmh) => write!(f, "{kmh}"),
            SpeedLimit::ZoneMaxSpeed => write!(f, "zone_maxspeed"),
        }
    }
}

/// Route character selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Fastest,
    Shortest,
    EnergyEfficient,
}

impl RouteMode {
    /// Search algorithm hint sent alongside the custom model.
    pub fn algorithm(self) -> Algorithm {
        match self {
            RouteMode::Fastest | RouteMode::EnergyEfficient => Algorithm::Dijkstra,
            RouteMode::Shortest => Algorithm::Astar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Dijkstra,
    Astar,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Astar => "astar",
        }
    }
}

/// An ordered, compiled rule set for one route request.
///
/// Weight rules share one index space, speed rules another; both are emitted
/// contiguously from 0 in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    weights: Vec<WeightRule>,
    speeds: Vec<SpeedRule>,
}

impl RuleSet {
    pub fn weights(&self) -> &[WeightRule] {
        &self.weights
    }

    pub fn speeds(&self) -> &[SpeedRule] {
        &self.speeds
    }

    /// Emits the ordered `(key, value)` pairs for the engine request.
    ///
    /// For weight rule `i`: `custom_model.priority[i].if`,
    /// `custom_model.priority[i].multiply_by`,
    /// `custom_model.distance_influence[i].if`,
    /// `custom_model.distance_influence[i].multiply_by`. For speed rule `j`:
    /// `custom_model.speed[j].if`, `custom_model.speed[j].limit_to`.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.weights.len() * 4 + self.speeds.len() * 2);
        for (i, rule) in self.weights.iter().enumerate() {
            let condition = rule.condition.to_string();
            params.push((format!("custom_model.priority[{i}].if"), condition.clone()));
            params.push((
                format!("custom_model.priority[{i}].multiply_by"),
                format_factor(rule.priority),
            ));
            params.push((format!("custom_model.distance_influence[{i}].if"), condition));
            params.push((
                format!("custom_model.distance_influence[{i}].multiply_by"),
                format_factor(rule.distance_influence),
            ));
        }
        for (j, rule) in self.speeds.iter().enumerate() {
            params.push((format!("custom_model.speed[{j}].if"), rule.condition.to_string()));
            params.push((format!("custom_model.speed[{j}].limit_to"), rule.limit.to_string()));
        }
        params
    }
}

/// Compiles the full policy for `mode`.
///
/// The fixed base policy (blocks, discouragement, infrastructure
/// preferences) occupies the leading indices for every mode; mode-specific
/// rules follow. Compilation is pure and total.
pub fn compile(mode: RouteMode) -> RuleSet {
    let mut weights = base_policy();
    match mode {
        RouteMode::Fastest => {
            weights.push(WeightRule::priority(
                Condition::AnyOf(vec![
                    Condition::RoadClass(RoadClass::Secondary),
                    Condition::RoadClass(RoadClass::Tertiary),
                ]),
                1.3,
            ));
            weights.push(WeightRule::distance_weight(0.5));
        }
        RouteMode::Shortest => {
            weights.push(WeightRule::distance_weight(2.0));
        }
        RouteMode::EnergyEfficient => {
            weights.push(WeightRule::priority(
                Condition::AnyOf(vec![
                    Condition::RoadClass(RoadClass::Residential),
                    Condition::RoadClass(RoadClass::Cycleway),
                ]),
                1.5,
            ));
            weights.push(WeightRule::distance_weight(1.0));
        }
    }
    RuleSet {
        weights,
        speeds: speed_caps(),
    }
}

/// Rules shared by every mode, in evaluation order: hard legal/safety blocks,
/// then the motorway/trunk discouragement, then moped infrastructure
/// preferences.
fn base_policy() -> Vec<WeightRule> {
    let mut rules = vec![
        WeightRule::block(Condition::RoadClass(RoadClass::Primary)),
        WeightRule::block(Condition::AccessNo(AccessMode::Moped)),
        WeightRule::block(Condition::AccessNo(AccessMode::MotorVehicle)),
        WeightRule::block(Condition::AccessNo(AccessMode::Vehicle)),
        WeightRule::block(Condition::MaxSpeedAbove(MOPED_SPEED_LIMIT_KMH)),
        WeightRule::block(Condition::ZoneMaxSpeedAbove(MOPED_SPEED_LIMIT_KMH)),
    ];
    for sign in [
        TrafficSign::C5,
        TrafficSign::C2,
        TrafficSign::C7,
        TrafficSign::C1,
        TrafficSign::C12,
    ] {
        rules.push(WeightRule::block(Condition::TrafficSign(sign)));
    }

    // passable, unlike PRIMARY, but a moped has no business there
    rules.push(WeightRule::priority(
        Condition::AnyOf(vec![
            Condition::RoadClass(RoadClass::Motorway),
            Condition::RoadClass(RoadClass::Trunk),
        ]),
        0.1,
    ));

    rules.push(WeightRule::prefer(
        Condition::AnyOf(vec![
            Condition::CyclewayMoped(CyclewayMoped::Designated),
            Condition::TrafficSign(TrafficSign::G12a),
        ]),
        1.5,
        0.8,
    ));
    rules.push(WeightRule::prefer(
        Condition::CyclewayMoped(CyclewayMoped::Yes),
        1.2,
        0.9,
    ));

    rules
}

/// The 45 km/h cap for every segment, plus the tighter cap inside slower
/// zones.
fn speed_caps() -> Vec<SpeedRule> {
    vec![
        SpeedRule {
            condition: Condition::Always,
            limit: SpeedLimit::Kmh(MOPED_SPEED_LIMIT_KMH),
        },
        SpeedRule {
            condition: Condition::ZoneMaxSpeedBelow(MOPED_SPEED_LIMIT_KMH),
            limit: SpeedLimit::ZoneMaxSpeed,
        },
    ]
}

/// Integral multipliers are emitted without a decimal point (`0`, `1`,
/// `1000`), everything else keeps one (`0.5`, `1.3`).
fn format_factor(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
