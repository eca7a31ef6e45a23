//! Script-to-storyboard scenes.

use crate::net::SceneOutline;

/// One storyboard panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub scene_number: u32,
    pub description: String,
    pub visual_prompt: String,
    /// Generated image as a `data:` URI.
    pub image: Option<String>,
    pub loading_image: bool,
}

impl From<SceneOutline> for Scene {
    fn from(outline: SceneOutline) -> Self {
        Self {
            scene_number: outline.scene_number,
            description: outline.description,
            visual_prompt: outline.visual_prompt,
            image: None,
            loading_image: false,
        }
    }
}

/// Ordered scenes from the last analysed script.
///
/// `revision` changes whenever the scene list is replaced or cleared, so a
/// render started against an older list can be told apart from one for the
/// current list even when the scene numbers collide.
#[derive(Debug, Clone, Default)]
pub struct Storyboard {
    scenes: Vec<Scene>,
    revision: u64,
}

impl Storyboard {
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace every scene with a fresh analysis.
    pub fn replace(&mut self, outlines: Vec<SceneOutline>) {
        self.scenes = outlines.into_iter().map(Scene::from).collect();
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.scenes.clear();
        self.revision += 1;
    }

    pub fn scene(&self, number: u32) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.scene_number == number)
    }

    fn scene_mut(&mut self, number: u32) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.scene_number == number)
    }

    /// Flag a scene as rendering. Returns its visual prompt.
    pub fn begin_render(&mut self, number: u32) -> Option<String> {
        let scene = self.scene_mut(number)?;
        scene.loading_image = true;
        Some(scene.visual_prompt.clone())
    }

    /// Store a rendered image. Images for unknown scenes or an older
    /// revision are dropped.
    pub fn finish_render(&mut self, revision: u64, number: u32, image: String) -> bool {
        if revision != self.revision {
            return false;
        }
        match self.scene_mut(number) {
            Some(scene) => {
                scene.loading_image = false;
                scene.image = Some(image);
                true
            },
            None => false,
        }
    }

    /// Clear the loading flag after a failed render.
    pub fn fail_render(&mut self, revision: u64, number: u32) {
        if revision != self.revision {
            return;
        }
        if let Some(scene) = self.scene_mut(number) {
            scene.loading_image = false;
        }
    }
}

/// Split a `data:<mime>;base64,<payload>` URI into MIME type and payload size.
pub fn describe_data_uri(uri: &str) -> Option<(&str, usize)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64").unwrap_or(meta);
    Some((mime, payload.len()))
}
