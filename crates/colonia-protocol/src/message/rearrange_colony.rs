//! `rearrangeColony`: move several colony workers at once.
//!
//! The client edits a scratch copy of its colony and sends only the units
//! whose placement changed. The batch is all-or-nothing: a single bad
//! arrangement rejects the whole request, so the controller never sees a
//! partially valid one.

use std::collections::HashSet;

use colonia_model::{Colony, Game, GoodsType, Id, Location, Player, Role, Unit, UnitLayout};

use super::ClientError;
use crate::{ARRAY_SIZE_KEY, Element};

/// One unit's proposed placement, with raw identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub unit: String,
    pub location: String,
    /// `None` is encoded by leaving the key out.
    pub work: Option<String>,
    pub role: String,
    /// Signed so a malformed count survives decoding and is rejected by
    /// validation.
    pub role_count: i32,
}

impl Arrangement {
    const UNIT: &'static str = "unit";
    const LOCATION: &'static str = "loc";
    const WORK: &'static str = "work";
    const ROLE: &'static str = "role";
    const COUNT: &'static str = "count";

    /// Read when a count is missing or does not parse.
    const BAD_COUNT: i64 = -1;

    pub fn from_layout(layout: &UnitLayout) -> Self {
        Self {
            unit: layout.unit.to_string(),
            location: layout.location.to_string(),
            work: layout.work.as_ref().map(ToString::to_string),
            role: layout.role.to_string(),
            role_count: i32::try_from(layout.role_count).unwrap_or(i32::MAX),
        }
    }

    fn read(element: &Element, index: usize) -> Self {
        let key = |field: &str| Element::indexed_key(index, field);
        let count = element.int_or(&key(Self::COUNT), Self::BAD_COUNT);
        Self {
            unit: element.string(&key(Self::UNIT)),
            location: element.string(&key(Self::LOCATION)),
            work: element.optional(&key(Self::WORK)),
            role: element.string(&key(Self::ROLE)),
            role_count: i32::try_from(count).unwrap_or(-1),
        }
    }

    fn write(&self, element: &mut Element, index: usize) {
        let key = |field: &str| Element::indexed_key(index, field);
        element.set(key(Self::UNIT), self.unit.as_str());
        element.set(key(Self::LOCATION), self.location.as_str());
        if let Some(work) = &self.work {
            element.set(key(Self::WORK), work.as_str());
        }
        element.set(key(Self::ROLE), self.role.as_str());
        element.set(key(Self::COUNT), self.role_count.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangeColonyMessage {
    pub colony: String,
    pub arrangements: Vec<Arrangement>,
}

/// An arrangement whose every reference resolved and passed the checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArrangement {
    pub unit: Id<Unit>,
    pub location: Location,
    pub work: Option<Id<GoodsType>>,
    pub role: Id<Role>,
    pub role_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RearrangeColonyRequest {
    colony: Id<Colony>,
    arrangements: Vec<ResolvedArrangement>,
}

impl RearrangeColonyRequest {
    pub fn colony(&self) -> &Id<Colony> {
        &self.colony
    }

    /// In the order the client sent them.
    pub fn arrangements(&self) -> &[ResolvedArrangement] {
        &self.arrangements
    }
}

impl RearrangeColonyMessage {
    pub const TAG: &'static str = "rearrangeColony";
    const COLONY: &'static str = "colony";

    pub fn new(colony: &Colony, arrangements: Vec<Arrangement>) -> Self {
        Self {
            colony: colony.id.to_string(),
            arrangements,
        }
    }

    /// Builds the message from the difference between the colony's current
    /// workers and a scratch layout.
    ///
    /// Units keep the order of `workers`. A unit is left out when it has no
    /// scratch entry or when its scratch entry matches its current location,
    /// work, role and role count.
    pub fn from_diff(colony: &Colony, workers: &[&Unit], scratch: &[UnitLayout]) -> Self {
        let arrangements = workers
            .iter()
            .filter_map(|unit| {
                let proposed = scratch.iter().find(|l| l.unit == unit.id)?;
                (unit.layout() != *proposed).then(|| Arrangement::from_layout(proposed))
            })
            .collect();
        Self::new(colony, arrangements)
    }

    pub fn from_element(element: &Element) -> Self {
        let arrangements = (0..element.count())
            .map(|i| Arrangement::read(element, i))
            .collect();
        Self {
            colony: element.string(Self::COLONY),
            arrangements,
        }
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new(Self::TAG)
            .with(Self::COLONY, self.colony.as_str())
            .with(ARRAY_SIZE_KEY, self.arrangements.len().to_string());
        for (i, arrangement) in self.arrangements.iter().enumerate() {
            arrangement.write(&mut element, i);
        }
        element
    }

    /// Rejects an empty batch, then validates the colony and every
    /// arrangement, stopping at the first failure.
    ///
    /// Per arrangement, in order: the unit is the player's, works in this
    /// colony and appears only once; the location resolves and belongs to
    /// this colony; the work type (if any) and the role exist; the role
    /// count is non-negative and within the role's maximum.
    ///
    /// # Errors
    /// A [`ClientError`]. Arrangement failures name the zero-based index.
    pub fn validate(
        &self,
        game: &Game,
        player: &Id<Player>,
    ) -> Result<RearrangeColonyRequest, ClientError> {
        if self.arrangements.is_empty() {
            return Err(ClientError::new(player, "Empty rearrangement list."));
        }
        let colony = game
            .resolve_ours::<Colony>(player, &self.colony)
            .map_err(|e| ClientError::resolution(player, "colony", e))?;

        let mut seen = HashSet::new();
        let arrangements = self
            .arrangements
            .iter()
            .enumerate()
            .map(|(i, a)| resolve_arrangement(game, player, colony, i, a, &mut seen))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RearrangeColonyRequest {
            colony: colony.id.clone(),
            arrangements,
        })
    }
}

fn resolve_arrangement(
    game: &Game,
    player: &Id<Player>,
    colony: &Colony,
    i: usize,
    a: &Arrangement,
    seen: &mut HashSet<Id<Unit>>,
) -> Result<ResolvedArrangement, ClientError> {
    let fail = |message: String| ClientError::new(player, message);

    let unit = game
        .resolve_ours::<Unit>(player, &a.unit)
        .map_err(|e| fail(format!("Invalid unit {i}: {e}")))?;
    if game.workplace_colony(unit) != Some(&colony.id) {
        return Err(fail(format!(
            "Invalid unit {i}: {} does not work in {}",
            unit.id, colony.name
        )));
    }
    if !seen.insert(unit.id.clone()) {
        return Err(fail(format!("Duplicate unit {i}: {}", unit.id)));
    }

    let location = game
        .find_location(&a.location)
        .map_err(|e| fail(format!("Invalid location {i}: {e}")))?;
    if game.colony_of(&location) != Some(&colony.id) {
        return Err(fail(format!(
            "Invalid location {i}: {location} is not part of {}",
            colony.name
        )));
    }

    let work = match &a.work {
        None => None,
        Some(raw) => {
            let goods = game
                .spec()
                .goods_type(raw)
                .ok_or_else(|| fail(format!("Invalid work type {i}: {raw}")))?;
            Some(goods.id.clone())
        }
    };

    let role = game
        .spec()
        .role(&a.role)
        .ok_or_else(|| fail(format!("Invalid role {i}: {}", a.role)))?;

    let Ok(role_count) = u32::try_from(a.role_count) else {
        return Err(fail(format!("Invalid role count {i}")));
    };
    if role_count > role.maximum_count {
        return Err(fail(format!(
            "Invalid role count {i}: {role_count} exceeds maximum {} for {}",
            role.maximum_count,
            role.suffix()
        )));
    }

    Ok(ResolvedArrangement {
        unit: unit.id.clone(),
        location,
        work,
        role: role.id.clone(),
        role_count,
    })
}
