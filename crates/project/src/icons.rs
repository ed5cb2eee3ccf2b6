use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Icon assets shown next to tree nodes.  
/// 樹節點旁顯示的圖示資源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Solution,
    Project,
    Folder,
    C,
    Cc,
    Cpp,
    H,
    Hpp,
    File,
}

impl Icon {
    /// Picks the icon for a file by its extension, ignoring case.  
    /// 依副檔名（不分大小寫）選擇檔案圖示。
    pub fn for_file_name(name: &str) -> Self {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("c") => Icon::C,
            Some("cc") => Icon::Cc,
            Some("cpp") | Some("cxx") => Icon::Cpp,
            Some("h") => Icon::H,
            Some("hh") | Some("hpp") | Some("hxx") => Icon::Hpp,
            // Objective-C sources (.m, .mm) have no dedicated asset.
            _ => Icon::File,
        }
    }

    pub fn asset_name(self) -> &'static str {
        match self {
            Icon::Solution => "sln.svg",
            Icon::Project => "vcxproj.svg",
            Icon::Folder => "folder.svg",
            Icon::C => "c.svg",
            Icon::Cc => "cc.svg",
            Icon::Cpp => "cpp.svg",
            Icon::H => "h.svg",
            Icon::Hpp => "hpp.svg",
            Icon::File => "file.svg",
        }
    }

    pub fn path_in(self, icon_root: &Path) -> PathBuf {
        icon_root.join(self.asset_name())
    }
}
