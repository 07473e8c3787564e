#![forbid(unsafe_code)]

//! Avatar: an image with a fallback shown until (or unless) it loads.
//!
//! Image loading is delegated to an [`ImageLoader`] polled on every render.
//! [`AvatarImage`] reports status changes to the root, and
//! [`AvatarFallback`] reads the published status, so a change reported in
//! one pass is visible to the fallback on the next pass.
//!
//! # Failure Modes
//!
//! | Scenario | Behavior |
//! |----------|----------|
//! | `src` missing | Status `Error`, fallback shown |
//! | Loader reports `Error` | Fallback shown, image omitted |

use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use hui_core::callback::Callback;
use hui_core::context::{ContextRegistry, Group, Provider};
use hui_core::markup::{Element, Node};
use hui_core::scope::Scope;
use web_time::Instant;

use crate::{Children, Component, PartProps, RenderResult};

pub const AVATAR: Group = Group::new("Avatar");

const IMAGE_NAME: &str = "Image";
const FALLBACK_NAME: &str = "Fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageLoadingStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl ImageLoadingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ImageLoadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of image loading progress.
pub trait ImageLoader {
    /// Current status of loading `src`.
    fn status(&self, src: &str) -> ImageLoadingStatus;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> ImageLoadingStatus,
{
    fn status(&self, src: &str) -> ImageLoadingStatus {
        self(src)
    }
}

/// Published by [`Avatar`].
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarContextValue {
    pub image_loading_status: ImageLoadingStatus,
    pub on_image_loading_status_change: Callback<ImageLoadingStatus>,
}

thread_local! {
    static AVATAR_CONTEXT: ContextRegistry<AvatarContextValue> = ContextRegistry::new(AVATAR.name());
}

/// Avatar context registry (thread-local).
#[must_use]
pub fn avatar_context() -> ContextRegistry<AvatarContextValue> {
    AVATAR_CONTEXT.with(Clone::clone)
}

/// Root `span`.
#[derive(Debug)]
pub struct Avatar {
    group: Group,
    status: Rc<Cell<ImageLoadingStatus>>,
    on_status_change: Callback<ImageLoadingStatus>,
    provider: Provider<AvatarContextValue>,
    props: PartProps,
    children: Children,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new()
    }
}

impl Avatar {
    #[must_use]
    pub fn new() -> Self {
        let status = Rc::new(Cell::new(ImageLoadingStatus::Idle));
        let sink = Rc::clone(&status);
        Self {
            group: AVATAR,
            status,
            on_status_change: Callback::new(move |s| sink.set(s)),
            provider: avatar_context().provider(),
            props: PartProps::new(),
            children: Children::new(),
        }
    }

    /// Last status reported by an image part.
    #[must_use]
    pub fn image_loading_status(&self) -> ImageLoadingStatus {
        self.status.get()
    }
}

crate::part_builders!(Avatar, group);
crate::child_builders!(Avatar);

impl Component for Avatar {
    fn render(&self, cx: &Scope) -> RenderResult {
        let _span = tracing::debug_span!("widget_render", widget = "Avatar").entered();
        let value = AvatarContextValue {
            image_loading_status: self.status.get(),
            on_image_loading_status_change: self.on_status_change.clone(),
        };
        let inner = self.provider.publish(cx, self.group, value);
        let el = Element::new("span").children(self.children.render(&inner)?);
        Ok(self.props.apply(el).into())
    }
}

/// `img` rendered once its source has loaded.
pub struct AvatarImage {
    group: Group,
    src: Option<String>,
    loader: Rc<dyn ImageLoader>,
    on_loading_status_change: Option<Callback<ImageLoadingStatus>>,
    status: Cell<ImageLoadingStatus>,
    props: PartProps,
}

impl fmt::Debug for AvatarImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarImage")
            .field("src", &self.src)
            .field("status", &self.status.get())
            .finish_non_exhaustive()
    }
}

impl AvatarImage {
    pub fn new(loader: impl ImageLoader + 'static) -> Self {
        Self {
            group: AVATAR,
            src: None,
            loader: Rc::new(loader),
            on_loading_status_change: None,
            status: Cell::new(ImageLoadingStatus::Idle),
            props: PartProps::new(),
        }
    }

    #[must_use]
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    #[must_use]
    pub fn on_loading_status_change(mut self, f: impl Fn(ImageLoadingStatus) + 'static) -> Self {
        self.on_loading_status_change = Some(Callback::new(f));
        self
    }

    fn poll(&self) -> ImageLoadingStatus {
        match self.src.as_deref() {
            None | Some("") => ImageLoadingStatus::Error,
            Some(src) => self.loader.status(src),
        }
    }
}

crate::part_builders!(AvatarImage, group);

impl Component for AvatarImage {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = avatar_context().lookup(cx, self.group, Some(IMAGE_NAME))?;
        let status = self.poll();
        if status != self.status.replace(status) && status != ImageLoadingStatus::Idle {
            tracing::debug!(status = %status, "avatar image status changed");
            if let Some(user) = &self.on_loading_status_change {
                user.call(status);
            }
            context.on_image_loading_status_change.call(status);
        }
        if status != ImageLoadingStatus::Loaded {
            return Ok(Node::Empty);
        }
        let el = Element::new("img").attr_opt("src", self.src.clone());
        Ok(self.props.apply(el).into())
    }
}

/// `span` shown while no image is loaded, optionally after a delay.
#[derive(Debug)]
pub struct AvatarFallback {
    group: Group,
    delay: Option<Duration>,
    started: OnceCell<Instant>,
    can_render: Cell<bool>,
    props: PartProps,
    children: Children,
}

impl Default for AvatarFallback {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarFallback {
    #[must_use]
    pub fn new() -> Self {
        Self {
            group: AVATAR,
            delay: None,
            started: OnceCell::new(),
            can_render: Cell::new(true),
            props: PartProps::new(),
            children: Children::new(),
        }
    }

    /// Hide the fallback until `delay` has passed since its first render.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self.can_render.set(false);
        self
    }

    fn delay_elapsed(&self) -> bool {
        if self.can_render.get() {
            return true;
        }
        let started = *self.started.get_or_init(Instant::now);
        let elapsed = self.delay.is_none_or(|delay| started.elapsed() >= delay);
        self.can_render.set(elapsed);
        elapsed
    }
}

crate::part_builders!(AvatarFallback, group);
crate::child_builders!(AvatarFallback);

impl Component for AvatarFallback {
    fn render(&self, cx: &Scope) -> RenderResult {
        let context = avatar_context().lookup(cx, self.group, Some(FALLBACK_NAME))?;
        if !self.delay_elapsed() || context.image_loading_status == ImageLoadingStatus::Loaded {
            return Ok(Node::Empty);
        }
        let el = Element::new("span").children(self.children.render(cx)?);
        Ok(self.props.apply(el).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(status: Rc<Cell<ImageLoadingStatus>>) -> impl Fn(&str) -> ImageLoadingStatus {
        move |_| status.get()
    }

    #[test]
    fn fallback_until_image_loads() {
        let status = Rc::new(Cell::new(ImageLoadingStatus::Loading));
        let avatar = Avatar::new()
            .child(AvatarImage::new(loader(Rc::clone(&status))).src("/me.png"))
            .child(AvatarFallback::new().child("AB"));
        let cx = Scope::root();

        assert_eq!(avatar.render(&cx).unwrap().to_html(), "<span><span>AB</span></span>");
        assert_eq!(avatar.image_loading_status(), ImageLoadingStatus::Loading);

        status.set(ImageLoadingStatus::Loaded);
        // Image appears immediately; the fallback sees the status next pass.
        assert_eq!(
            avatar.render(&cx).unwrap().to_html(),
            "<span><img src=\"/me.png\"><span>AB</span></span>"
        );
        assert_eq!(avatar.render(&cx).unwrap().to_html(), "<span><img src=\"/me.png\"></span>");
    }

    #[test]
    fn missing_src_is_error() {
        let seen = Rc::new(Cell::new(ImageLoadingStatus::Idle));
        let s = Rc::clone(&seen);
        let avatar = Avatar::new().child(
            AvatarImage::new(|_: &str| ImageLoadingStatus::Loaded).on_loading_status_change(move |st| s.set(st)),
        );
        avatar.render(&Scope::root()).unwrap();
        assert_eq!(seen.get(), ImageLoadingStatus::Error);
        assert_eq!(avatar.image_loading_status(), ImageLoadingStatus::Error);
    }

    #[test]
    fn delayed_fallback_waits() {
        let avatar = Avatar::new()
            .child(AvatarFallback::new().delay(Duration::from_secs(3600)).child("AB"));
        assert_eq!(avatar.render(&Scope::root()).unwrap().to_html(), "<span></span>");

        let avatar = Avatar::new().child(AvatarFallback::new().delay(Duration::ZERO).child("AB"));
        assert_eq!(avatar.render(&Scope::root()).unwrap().to_html(), "<span><span>AB</span></span>");
    }

    #[test]
    fn image_outside_avatar_fails() {
        let err = AvatarImage::new(|_: &str| ImageLoadingStatus::Loaded)
            .render(&Scope::root())
            .unwrap_err();
        assert_eq!(err.to_string(), "Image must be used within Avatar");
    }
}
