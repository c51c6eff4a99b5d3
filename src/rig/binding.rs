//! Name → handle resolution for the rig's scene nodes.
//!
//! Runs once when a [`CharacterRig`](crate::rig::CharacterRig) is created.
//! Every later access goes through the resolved [`RigNodes`] handles.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RigError};
use crate::rig::arms::ArmNodes;
use crate::rig::gait::LegNodes;
use crate::scene::{NodeHandle, Scene};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegNodeNames {
    pub target: String,
    pub home: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmNodeNames {
    pub target: String,
    pub anchor: String,
}

/// Scene node names the rig binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigNodeNames {
    pub root: String,
    pub head: String,
    pub left_eye: String,
    pub right_eye: String,
    pub left_leg: LegNodeNames,
    pub right_leg: LegNodeNames,
    pub arms: Vec<ArmNodeNames>,
    /// Node carrying the facial morph targets.
    pub face: String,
    /// Distance origin for the locomotion band; the root when unset.
    pub locomotion_reference: Option<String>,
    /// Distance origin for the expression trigger; the head when unset.
    pub expression_reference: Option<String>,
}

impl Default for RigNodeNames {
    fn default() -> Self {
        let leg = |side: &str| LegNodeNames {
            target: format!("{side}LegTarget"),
            home: format!("{side}LegHome"),
        };
        let arm = |side: &str| ArmNodeNames {
            target: format!("{side}HandTarget"),
            anchor: format!("{side}GrabAnchor"),
        };
        Self {
            root: "Root".to_owned(),
            head: "Head".to_owned(),
            left_eye: "LeftEye".to_owned(),
            right_eye: "RightEye".to_owned(),
            left_leg: leg("Left"),
            right_leg: leg("Right"),
            arms: vec![arm("Left"), arm("Right")],
            face: "Face".to_owned(),
            locomotion_reference: None,
            expression_reference: None,
        }
    }
}

/// Resolved handles for every node the rig touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigNodes {
    pub root: NodeHandle,
    pub head: NodeHandle,
    pub left_eye: NodeHandle,
    pub right_eye: NodeHandle,
    pub left_leg: LegNodes,
    pub right_leg: LegNodes,
    pub arms: Vec<ArmNodes>,
    pub face: NodeHandle,
    pub locomotion_reference: NodeHandle,
    pub expression_reference: NodeHandle,
}

impl RigNodes {
    /// Looks up every named node, failing on the first one missing.
    pub fn bind(scene: &Scene, names: &RigNodeNames) -> Result<Self> {
        let find = |name: &str| {
            scene
                .find_node_by_name(name)
                .ok_or_else(|| RigError::NodeNotFound(name.to_owned()))
        };
        let leg = |leg: &LegNodeNames| -> Result<LegNodes> {
            Ok(LegNodes {
                target: find(&leg.target)?,
                home: find(&leg.home)?,
            })
        };

        let root = find(&names.root)?;
        let head = find(&names.head)?;

        let arms = names
            .arms
            .iter()
            .map(|arm| -> Result<ArmNodes> {
                Ok(ArmNodes {
                    target: find(&arm.target)?,
                    anchor: find(&arm.anchor)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root,
            head,
            left_eye: find(&names.left_eye)?,
            right_eye: find(&names.right_eye)?,
            left_leg: leg(&names.left_leg)?,
            right_leg: leg(&names.right_leg)?,
            arms,
            face: find(&names.face)?,
            locomotion_reference: match &names.locomotion_reference {
                Some(name) => find(name)?,
                None => root,
            },
            expression_reference: match &names.expression_reference {
                Some(name) => find(name)?,
                None => head,
            },
        })
    }
}
