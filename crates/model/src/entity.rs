use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Placeholder entity bound to the solution root.  
/// 綁定於方案根節點的空白實體。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullModel;

impl NullModel {
    pub const INSTANCE: NullModel = NullModel;
}

/// A single source file inside a group.  
/// 檔案群組內的單一原始檔。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct File {
    name: String,
    full_name: String,
}

impl File {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
        }
    }

    /// Builds a file whose short name is the last component of `full_name`.  
    /// 以完整路徑的最後一段作為檔案短名稱。
    pub fn from_path(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = Path::new(&full_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&full_name)
            .to_string();
        Self { name, full_name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

/// Ordered collection of files shown as one folder (e.g. "Source Files").  
/// 以單一資料夾呈現的有序檔案集合。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileGroup {
    name: String,
    #[serde(default)]
    files: Vec<Arc<File>>,
}

impl FileGroup {
    pub fn new(name: impl Into<String>, files: Vec<Arc<File>>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn files(&self) -> &[Arc<File>] {
        &self.files
    }
}

/// A project with its file groups.  
/// 專案及其檔案群組。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    name: String,
    full_name: String,
    #[serde(default)]
    groups: Vec<Arc<FileGroup>>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        full_name: impl Into<String>,
        groups: Vec<Arc<FileGroup>>,
    ) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            groups,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn groups(&self) -> &[Arc<FileGroup>] {
        &self.groups
    }
}

/// Borrowed view over any entity a tree node can be bound to.  
/// 樹節點可綁定之任一實體的借用檢視。
#[derive(Debug, Clone, Copy)]
pub enum ModelRef<'a> {
    Null(&'a NullModel),
    Project(&'a Project),
    FileGroup(&'a FileGroup),
    File(&'a File),
}

impl<'a> ModelRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ModelRef::Null(_) => "",
            ModelRef::Project(project) => project.name(),
            ModelRef::FileGroup(group) => group.name(),
            ModelRef::File(file) => file.name(),
        }
    }

    /// Groups carry no qualified name of their own and report their short name.
    pub fn full_name(&self) -> &'a str {
        match self {
            ModelRef::Null(_) => "",
            ModelRef::Project(project) => project.full_name(),
            ModelRef::FileGroup(group) => group.name(),
            ModelRef::File(file) => file.full_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ModelRef::Null(_))
    }

    pub fn as_project(&self) -> Option<&'a Project> {
        match self {
            ModelRef::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn as_file_group(&self) -> Option<&'a FileGroup> {
        match self {
            ModelRef::FileGroup(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&'a File> {
        match self {
            ModelRef::File(file) => Some(file),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_uses_last_component_as_name() {
        let file = File::from_path("App/Sources/main.cpp");
        assert_eq!(file.name(), "main.cpp");
        assert_eq!(file.full_name(), "App/Sources/main.cpp");

        let bare = File::from_path("README");
        assert_eq!(bare.name(), "README");
    }

    #[test]
    fn model_ref_reports_names_per_kind() {
        let file = Arc::new(File::new("util.h", "App/Sources/util.h"));
        let group = FileGroup::new("Headers", vec![file.clone()]);
        let project = Project::new("App", "App/App.vcxproj", Vec::new());

        assert_eq!(ModelRef::Null(&NullModel::INSTANCE).full_name(), "");
        assert!(ModelRef::Null(&NullModel::INSTANCE).is_null());
        assert_eq!(ModelRef::FileGroup(&group).full_name(), "Headers");
        assert_eq!(ModelRef::Project(&project).full_name(), "App/App.vcxproj");
        assert_eq!(ModelRef::File(&file).name(), "util.h");
        assert!(ModelRef::Project(&project).as_file().is_none());
        assert_eq!(
            ModelRef::FileGroup(&group).as_file_group().map(|g| g.files().len()),
            Some(1)
        );
    }
}
