//! Static rule data: goods types, roles, unit types and building types.
//!
//! Game content is defined elsewhere and loaded once. The protocol only
//! needs it as lookup tables keyed by identifier, which is all this module
//! provides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Id;

/// A kind of goods a unit can be assigned to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsType {
    pub id: Id<GoodsType>,
    pub name: String,
}

/// A role a unit can take on, such as soldier or pioneer.
///
/// `maximum_count` is how many units of the role's equipment a unit can
/// carry: a dragoon carries one lot, a pioneer up to four lots of tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: Id<Role>,
    pub maximum_count: u32,
    /// Offensive roles turn a settlement visit into an attack.
    pub offensive: bool,
}

impl Role {
    pub const DEFAULT: &'static str = "model.role.default";
    pub const SOLDIER: &'static str = "model.role.soldier";
    pub const DRAGOON: &'static str = "model.role.dragoon";
    pub const PIONEER: &'static str = "model.role.pioneer";
    pub const MISSIONARY: &'static str = "model.role.missionary";
    pub const SCOUT: &'static str = "model.role.scout";

    /// The part of the id after the last dot, e.g. `"soldier"`.
    pub fn suffix(&self) -> &str {
        let raw = self.id.as_str();
        raw.rsplit('.').next().unwrap_or(raw)
    }
}

/// A type of unit.
///
/// `skill` follows the usual convention: 0 for an unskilled free colonist,
/// positive for experts, negative for servants and criminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: Id<UnitType>,
    pub skill: i32,
    pub naval: bool,
    /// Number of units or goods lots this type can carry.
    pub space: u32,
}

impl UnitType {
    /// Only unskilled colonists can be taught by natives.
    pub fn can_learn_from_natives(&self) -> bool {
        !self.naval && self.skill == 0
    }
}

/// A type of colony building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingType {
    pub id: Id<BuildingType>,
    /// Number of units that can work inside at the same time.
    pub workplaces: usize,
}

/// All rule tables for one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    goods_types: BTreeMap<String, GoodsType>,
    roles: BTreeMap<String, Role>,
    unit_types: BTreeMap<String, UnitType>,
    building_types: BTreeMap<String, BuildingType>,
}

impl Specification {
    /// The rule set used by a standard game.
    pub fn classic() -> Self {
        let mut spec = Self::default();

        for (id, name) in [
            ("model.goods.food", "food"),
            ("model.goods.sugar", "sugar"),
            ("model.goods.tobacco", "tobacco"),
            ("model.goods.cotton", "cotton"),
            ("model.goods.furs", "furs"),
            ("model.goods.lumber", "lumber"),
            ("model.goods.ore", "ore"),
            ("model.goods.silver", "silver"),
            ("model.goods.horses", "horses"),
            ("model.goods.rum", "rum"),
            ("model.goods.cigars", "cigars"),
            ("model.goods.cloth", "cloth"),
            ("model.goods.coats", "coats"),
            ("model.goods.tools", "tools"),
            ("model.goods.muskets", "muskets"),
            ("model.goods.hammers", "hammers"),
            ("model.goods.bells", "bells"),
            ("model.goods.crosses", "crosses"),
        ] {
            spec.add_goods_type(GoodsType {
                id: Id::new(id),
                name: name.to_string(),
            });
        }

        for (id, maximum_count, offensive) in [
            (Role::DEFAULT, 0, false),
            (Role::SOLDIER, 1, true),
            (Role::DRAGOON, 1, true),
            (Role::PIONEER, 4, false),
            (Role::MISSIONARY, 1, false),
            (Role::SCOUT, 1, false),
        ] {
            spec.add_role(Role {
                id: Id::new(id),
                maximum_count,
                offensive,
            });
        }

        for (id, skill, naval, space) in [
            ("model.unit.freeColonist", 0, false, 0),
            ("model.unit.indenturedServant", -1, false, 0),
            ("model.unit.pettyCriminal", -2, false, 0),
            ("model.unit.expertFarmer", 1, false, 0),
            ("model.unit.masterCarpenter", 2, false, 0),
            ("model.unit.caravel", 0, true, 2),
            ("model.unit.merchantman", 0, true, 4),
        ] {
            spec.add_unit_type(UnitType {
                id: Id::new(id),
                skill,
                naval,
                space,
            });
        }

        for (id, workplaces) in [
            ("model.building.townHall", 3),
            ("model.building.carpenterHouse", 3),
            ("model.building.blacksmithHouse", 3),
            ("model.building.church", 1),
            ("model.building.stockade", 0),
        ] {
            spec.add_building_type(BuildingType {
                id: Id::new(id),
                workplaces,
            });
        }

        spec
    }

    pub fn add_goods_type(&mut self, goods_type: GoodsType) {
        self.goods_types
            .insert(goods_type.id.as_str().to_string(), goods_type);
    }

    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role.id.as_str().to_string(), role);
    }

    pub fn add_unit_type(&mut self, unit_type: UnitType) {
        self.unit_types
            .insert(unit_type.id.as_str().to_string(), unit_type);
    }

    pub fn add_building_type(&mut self, building_type: BuildingType) {
        self.building_types
            .insert(building_type.id.as_str().to_string(), building_type);
    }

    pub fn goods_type(&self, id: &str) -> Option<&GoodsType> {
        self.goods_types.get(id)
    }

    pub fn role(&self, id: &str) -> Option<&Role> {
        self.roles.get(id)
    }

    pub fn unit_type(&self, id: &str) -> Option<&UnitType> {
        self.unit_types.get(id)
    }

    pub fn building_type(&self, id: &str) -> Option<&BuildingType> {
        self.building_types.get(id)
    }
}
