// Copyright 2024 BlancLog Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Where a log record's module name comes from.
///
/// Either a plain label (typically the record's target) or a structured
/// context carrying a module name resolved from the request. The two cases
/// are distinguished by an explicit match, never by shape inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleContext {
    /// A plain label.
    Label(String),
    /// A structured context with an explicit module name.
    Module { name: String },
}

impl ModuleContext {
    /// Resolve the module context from a request path.
    ///
    /// Paths of the form `/api/<module>/...` resolve to a structured module
    /// context named after the first segment below `/api/`; everything else
    /// resolves to the `UnknownModule` label.
    pub fn from_request_path(path: &str) -> Self {
        let module = path
            .strip_prefix("/api/")
            .map(|rest| rest.split(['/', '?']).next().unwrap_or(rest))
            .filter(|module| !module.is_empty());
        match module {
            Some(module) => ModuleContext::Module {
                name: module.to_string(),
            },
            None => ModuleContext::Label("UnknownModule".to_string()),
        }
    }

    /// The module name to display, regardless of case.
    pub fn name(&self) -> &str {
        match self {
            ModuleContext::Label(label) => label,
            ModuleContext::Module { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path_resolves_to_module() {
        assert_eq!(
            ModuleContext::from_request_path("/api/users/42"),
            ModuleContext::Module {
                name: "users".to_string()
            }
        );
        assert_eq!(
            ModuleContext::from_request_path("/api/orders?page=2"),
            ModuleContext::Module {
                name: "orders".to_string()
            }
        );
    }

    #[test]
    fn test_non_api_path_resolves_to_unknown_label() {
        for path in ["/health", "/", "", "/apifoo", "/api/"] {
            assert_eq!(
                ModuleContext::from_request_path(path),
                ModuleContext::Label("UnknownModule".to_string()),
                "path={path:?}"
            );
        }
    }

    #[test]
    fn test_name_resolves_by_match() {
        assert_eq!(ModuleContext::Label("App".to_string()).name(), "App");
        assert_eq!(
            ModuleContext::Module {
                name: "users".to_string()
            }
            .name(),
            "users"
        );
    }
}
