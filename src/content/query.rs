//! Module filtering for index and search consumers.

use crate::content::module::Module;
use crate::core::fields::ContentEnum;
use serde::{Deserialize, Serialize};

/// Filter criteria over modules. `None` and blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModuleQuery {
    pub ship: Option<String>,
    pub role: Option<String>,
    pub enemy: Option<String>,
    pub map: Option<String>,
    pub status: Option<String>,
    pub module_type: Option<String>,
    /// Matches against module tags.
    pub domain: Option<String>,
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains(list: &[String], wanted: Option<&str>) -> bool {
    wanted.is_none_or(|w| list.iter().any(|item| item == w))
}

impl ModuleQuery {
    pub fn is_empty(&self) -> bool {
        [
            &self.ship,
            &self.role,
            &self.enemy,
            &self.map,
            &self.status,
            &self.module_type,
            &self.domain,
        ]
        .into_iter()
        .all(|c| criterion(c).is_none())
    }

    pub fn matches(&self, module: &Module) -> bool {
        module.matches_ship_role(criterion(&self.ship), criterion(&self.role))
            && contains(&module.enemies, criterion(&self.enemy))
            && contains(&module.maps, criterion(&self.map))
            && criterion(&self.status).is_none_or(|s| module.status.as_str() == s)
            && criterion(&self.module_type).is_none_or(|t| module.module_type.as_str() == t)
            && contains(&module.tags, criterion(&self.domain))
    }
}
