// Corkboard - A classic bulletin board engine rebuilt with Rust
// Copyright (C) 2025 Corkboard Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::path::Path;

/// Result of probing for a decoration image on disk.
///
/// A miss is a normal outcome, not an error; pages simply render without
/// the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTailImg {
    pub found: bool,
    pub url: String,
}

impl HeadTailImg {
    fn missing() -> Self {
        Self {
            found: false,
            url: String::new(),
        }
    }
}

const IMG_EXTENSIONS: [&str; 3] = ["gif", "jpg", "png"];

/// Probe `{data_dir}/{kind}/{base_name}.{ext}` for the known image
/// extensions, in order. The first hit wins and is returned as the public
/// `/data/...` URL.
///
/// Content pages use this for their `{co_id}_h` and `{co_id}_t` banners;
/// the `kind` segment keeps it usable for other record types stored under
/// the data directory.
pub fn head_tail_img(data_dir: &str, kind: &str, base_name: &str) -> HeadTailImg {
    for ext in IMG_EXTENSIONS {
        let file = format!("{}.{}", base_name, ext);
        if Path::new(data_dir).join(kind).join(&file).is_file() {
            return HeadTailImg {
                found: true,
                url: format!("/data/{}/{}", kind, file),
            };
        }
    }

    HeadTailImg::missing()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_missing_files_return_empty_url() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let data_dir = dir.path().to_string_lossy().to_string();

        let probe = head_tail_img(&data_dir, "content", "about_h");
        assert!(!probe.found);
        assert_eq!(probe.url, "");

        Ok(())
    }

    #[test]
    fn test_png_head_image_is_found() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let content_dir = dir.path().join("content");
        std::fs::create_dir_all(&content_dir)?;
        std::fs::write(content_dir.join("about_h.png"), b"png")?;

        let data_dir = dir.path().to_string_lossy().to_string();
        let probe = head_tail_img(&data_dir, "content", "about_h");
        assert!(probe.found);
        assert_eq!(probe.url, "/data/content/about_h.png");

        Ok(())
    }

    #[test]
    fn test_extension_order_prefers_gif() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let content_dir = dir.path().join("content");
        std::fs::create_dir_all(&content_dir)?;
        std::fs::write(content_dir.join("about_t.gif"), b"gif")?;
        std::fs::write(content_dir.join("about_t.png"), b"png")?;

        let data_dir = dir.path().to_string_lossy().to_string();
        let probe = head_tail_img(&data_dir, "content", "about_t");
        assert_eq!(probe.url, "/data/content/about_t.gif");

        Ok(())
    }

    #[test]
    fn test_directory_named_like_image_is_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let trap = dir.path().join("content").join("about_h.gif");
        std::fs::create_dir_all(&trap)?;

        let data_dir = dir.path().to_string_lossy().to_string();
        let probe = head_tail_img(&data_dir, "content", "about_h");
        assert!(!probe.found);

        Ok(())
    }
}
