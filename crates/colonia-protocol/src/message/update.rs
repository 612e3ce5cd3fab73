//! `update`: the server's answer to an accepted request.

use colonia_model::{Settlement, Unit};

use crate::{ARRAY_SIZE_KEY, Element};

/// One changed object, as the client needs to see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Unit {
        id: String,
        location: String,
        work: Option<String>,
        role: String,
        role_count: u32,
        moves_left: u32,
    },
    Settlement {
        id: String,
        /// Only present once the player has been told.
        skill: Option<String>,
    },
    Removed {
        id: String,
    },
}

impl Change {
    const TYPE: &'static str = "type";
    const ID: &'static str = "id";
    const LOCATION: &'static str = "loc";
    const WORK: &'static str = "work";
    const ROLE: &'static str = "role";
    const COUNT: &'static str = "count";
    const MOVES: &'static str = "moves";
    const SKILL: &'static str = "skill";

    const UNIT_TYPE: &'static str = "unit";
    const SETTLEMENT_TYPE: &'static str = "settlement";
    const REMOVED_TYPE: &'static str = "remove";

    pub fn unit(unit: &Unit) -> Self {
        Self::Unit {
            id: unit.id.to_string(),
            location: unit.location.to_string(),
            work: unit.work.as_ref().map(ToString::to_string),
            role: unit.role.to_string(),
            role_count: unit.role_count,
            moves_left: unit.moves_left,
        }
    }

    pub fn settlement(settlement: &Settlement) -> Self {
        Self::Settlement {
            id: settlement.id.to_string(),
            skill: settlement.skill.as_ref().map(ToString::to_string),
        }
    }

    pub fn removed(id: impl Into<String>) -> Self {
        Self::Removed { id: id.into() }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Unit { id, .. } | Self::Settlement { id, .. } | Self::Removed { id } => id,
        }
    }

    fn read(element: &Element, index: usize) -> Option<Self> {
        let key = |field: &str| Element::indexed_key(index, field);
        let id = element.string(&key(Self::ID));
        let count = |field: &str| u32::try_from(element.int_or(&key(field), 0)).unwrap_or(0);
        match element.get(&key(Self::TYPE)).unwrap_or_default() {
            Self::UNIT_TYPE => Some(Self::Unit {
                id,
                location: element.string(&key(Self::LOCATION)),
                work: element.optional(&key(Self::WORK)),
                role: element.string(&key(Self::ROLE)),
                role_count: count(Self::COUNT),
                moves_left: count(Self::MOVES),
            }),
            Self::SETTLEMENT_TYPE => Some(Self::Settlement {
                id,
                skill: element.optional(&key(Self::SKILL)),
            }),
            Self::REMOVED_TYPE => Some(Self::Removed { id }),
            other => {
                tracing::debug!(index, change_type = other, "skipping unknown change type");
                None
            }
        }
    }

    fn write(&self, element: &mut Element, index: usize) {
        let key = |field: &str| Element::indexed_key(index, field);
        match self {
            Self::Unit {
                id,
                location,
                work,
                role,
                role_count,
                moves_left,
            } => {
                element.set(key(Self::TYPE), Self::UNIT_TYPE);
                element.set(key(Self::ID), id.as_str());
                element.set(key(Self::LOCATION), location.as_str());
                if let Some(work) = work {
                    element.set(key(Self::WORK), work.as_str());
                }
                element.set(key(Self::ROLE), role.as_str());
                element.set(key(Self::COUNT), role_count.to_string());
                element.set(key(Self::MOVES), moves_left.to_string());
            }
            Self::Settlement { id, skill } => {
                element.set(key(Self::TYPE), Self::SETTLEMENT_TYPE);
                element.set(key(Self::ID), id.as_str());
                if let Some(skill) = skill {
                    element.set(key(Self::SKILL), skill.as_str());
                }
            }
            Self::Removed { id } => {
                element.set(key(Self::TYPE), Self::REMOVED_TYPE);
                element.set(key(Self::ID), id.as_str());
            }
        }
    }
}

/// The objects a request changed, in the order the controller reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    pub changes: Vec<Change>,
}

impl Update {
    pub const TAG: &'static str = "update";

    pub fn new(changes: Vec<Change>) -> Self {
        Self { changes }
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn from_element(element: &Element) -> Self {
        let changes = (0..element.count())
            .filter_map(|i| Change::read(element, i))
            .collect();
        Self { changes }
    }

    pub fn to_element(&self) -> Element {
        let mut element =
            Element::new(Self::TAG).with(ARRAY_SIZE_KEY, self.changes.len().to_string());
        for (i, change) in self.changes.iter().enumerate() {
            change.write(&mut element, i);
        }
        element
    }
}
