use std::collections::BTreeSet;

use super::BackOutcome;
use super::StackCtx;
use super::ViewFrame;
use super::ViewStack;
use crate::reducer::PhoneEffect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub author: &'static str,
    pub age: &'static str,
    pub content: &'static str,
    pub likes: u32,
    pub comments: u32,
}

pub const POSTS: [Post; 3] = [
    Post {
        id: 1,
        author: "Alex Chen",
        age: "2h",
        content: "Just finished building an amazing mobile app! The future is mobile-first.",
        likes: 42,
        comments: 8,
    },
    Post {
        id: 2,
        author: "Sarah Kim",
        age: "4h",
        content: "Beautiful sunset from my studio window. Nature is the best designer.",
        likes: 128,
        comments: 23,
    },
    Post {
        id: 3,
        author: "Mike Johnson",
        age: "6h",
        content: "Trying out a new recipe today. Cooking is like coding, both need patience.",
        likes: 67,
        comments: 15,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialTab {
    Feed,
    Discover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialInput {
    SelectTab(SocialTab),
    ToggleLike(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialStack {
    pub tab: SocialTab,
    liked: BTreeSet<u64>,
}

impl Default for SocialStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SocialStack {
    pub fn new() -> Self {
        Self {
            tab: SocialTab::Feed,
            liked: BTreeSet::new(),
        }
    }

    pub fn is_liked(&self, post_id: u64) -> bool {
        self.liked.contains(&post_id)
    }

    pub fn like_count(&self, post: &Post) -> u32 {
        post.likes + u32::from(self.is_liked(post.id))
    }

    pub fn handle(&mut self, input: SocialInput) -> Vec<PhoneEffect> {
        match input {
            SocialInput::SelectTab(tab) => self.tab = tab,
            SocialInput::ToggleLike(id) => {
                if !POSTS.iter().any(|post| post.id == id) {
                    return Vec::new();
                }
                if !self.liked.remove(&id) {
                    self.liked.insert(id);
                }
            }
        }
        vec![PhoneEffect::RequestFrame]
    }
}

impl ViewStack for SocialStack {
    fn frame(&self) -> ViewFrame {
        ViewFrame {
            title: "SocialHub".to_string(),
            view: match self.tab {
                SocialTab::Feed => "feed",
                SocialTab::Discover => "discover",
            },
            loading: false,
            degraded: false,
            is_initial: true,
        }
    }

    fn activate(&mut self, _ctx: &mut StackCtx<'_>) -> Vec<PhoneEffect> {
        Vec::new()
    }

    fn back(&mut self, _ctx: &mut StackCtx<'_>) -> BackOutcome {
        BackOutcome::CloseApp
    }

    fn on_close(&mut self) {
        *self = Self::new();
    }
}
