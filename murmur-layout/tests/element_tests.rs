//! Integration tests for the content element variants.

use std::sync::Arc;

use chrono::NaiveDate;
use murmur_layout::layout::{ImageBackground, ELLIPSIS};
use murmur_layout::{
    BadgeKind, Color, ContentElement, CopyMode, ElementFlags, Emote, FontStyle, ImageSet,
    LayoutElement, LayoutKind, LinkKind, MemoryImageCache, Message, MessageColor, MessageColors,
    MessageFlags, MessageLayout, MonospaceMetrics, PaintCommand, PaintRecorder, RenderingContext,
    Selection, SelectionItem, Settings,
};

const EMOTE_FLAGS: ElementFlags = ElementFlags::CHANNEL_EMOTE_IMAGE.union(ElementFlags::CHANNEL_EMOTE_TEXT);

struct Fixture {
    settings: Settings,
    colors: MessageColors,
    metrics: MonospaceMetrics,
    images: MemoryImageCache,
}

impl Fixture {
    fn new() -> Self {
        let mut images = MemoryImageCache::new();
        images.insert("kappa", 28.0, 28.0);
        images.insert("mod", 18.0, 18.0);
        images.insert("avatar", 20.0, 20.0);
        images.insert("hat", 20.0, 12.0);
        images.insert_animated("party", 32.0, 32.0);
        Self {
            settings: Settings::default(),
            colors: MessageColors::default(),
            metrics: MonospaceMetrics::default(),
            images,
        }
    }

    fn ctx(&self) -> RenderingContext<'_> {
        RenderingContext::new(&self.settings, &self.colors, &self.metrics, &self.images)
    }

    fn lay_out_with(&self, ctx: &RenderingContext<'_>, elements: Vec<ContentElement>) -> MessageLayout {
        let mut layout = MessageLayout::new(Arc::new(Message::new("el", MessageFlags::empty(), elements)));
        layout.layout(ctx);
        layout
    }

    fn lay_out(&self, elements: Vec<ContentElement>) -> MessageLayout {
        self.lay_out_with(&self.ctx(), elements)
    }
}

fn text_color(element: &LayoutElement) -> Option<Color> {
    match &element.kind {
        LayoutKind::Text { color, .. } => Some(*color),
        _ => None,
    }
}

fn kappa() -> Emote {
    Emote::new("Kappa", ImageSet::single("kappa"))
}

// ============================================================================
// Emotes
// ============================================================================

#[test]
fn emote_becomes_image() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::emote(kappa(), EMOTE_FLAGS)]);

    let element = &layout.container().elements()[0];
    assert!(matches!(element.kind, LayoutKind::Image { .. }));
    assert_eq!(element.rect.width, 28.0);
    assert_eq!(element.copy_text.as_deref(), Some("Kappa"));
    assert!(element.is_emote_image());
}

#[test]
fn compact_emotes_shrink_the_line() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::emote(kappa(), EMOTE_FLAGS)]);

    // 28px emote contributes 22px; it is nudged down by 3px.
    let element = &layout.container().elements()[0];
    assert_eq!(layout.height(), 4.0 + 22.0 + 4.0);
    assert_eq!(element.rect.y, 4.0 - 28.0 + 22.0 + 3.0);
}

#[test]
fn emote_scale_setting_applies() {
    let mut fixture = Fixture::new();
    fixture.settings.emote_scale = 2.0;
    let layout = fixture.lay_out(vec![ContentElement::emote(kappa(), EMOTE_FLAGS)]);
    assert_eq!(layout.container().elements()[0].rect.width, 56.0);
}

#[test]
fn compact_emotes_can_be_disabled_per_message() {
    let fixture = Fixture::new();
    let mut layout = MessageLayout::new(Arc::new(Message::new(
        "full-height",
        MessageFlags::DISABLE_COMPACT_EMOTES,
        vec![ContentElement::emote(kappa(), EMOTE_FLAGS)],
    )));
    layout.layout(&fixture.ctx());

    let element = &layout.container().elements()[0];
    assert_eq!(layout.height(), 4.0 + 28.0 + 4.0);
    assert_eq!(element.rect.y, 4.0);
}

fn small_emote(name: &str) -> ContentElement {
    ContentElement::emote(Emote::new(name, ImageSet::single("small")), EMOTE_FLAGS)
}

fn x_ranges(layout: &MessageLayout) -> Vec<(f32, f32)> {
    layout
        .container()
        .elements()
        .iter()
        .map(|element| (element.rect.x, element.rect.right()))
        .collect()
}

#[test]
fn spaces_between_emotes_follow_setting() {
    let mut fixture = Fixture::new();
    fixture.images.insert("small", 16.0, 16.0);
    let elements = || {
        vec![
            small_emote("A"),
            small_emote("B"),
            ContentElement::text("x", ElementFlags::TEXT),
        ]
    };

    let spaced = fixture.lay_out(elements());
    assert_eq!(x_ranges(&spaced), vec![(8.0, 24.0), (32.0, 48.0), (56.0, 64.0)]);

    fixture.settings.remove_spaces_between_emotes = true;
    let flush = fixture.lay_out(elements());
    assert_eq!(x_ranges(&flush), vec![(8.0, 24.0), (24.0, 40.0), (48.0, 56.0)]);

    // Only the placement changes; copied text keeps its spaces.
    for layout in [&spaced, &flush] {
        let mut text = String::new();
        layout
            .container()
            .add_selection_text(&mut text, 0, usize::MAX, CopyMode::Everything);
        assert_eq!(text, "A B x ");
    }
}

#[test]
fn spaces_between_emotes_removed_in_rtl_line() {
    let mut fixture = Fixture::new();
    fixture.images.insert("small", 16.0, 16.0);
    fixture.settings.remove_spaces_between_emotes = true;
    let layout = fixture.lay_out(vec![
        ContentElement::username("@u", "u", MessageColor::Text),
        ContentElement::text("ور", ElementFlags::TEXT),
        small_emote("A"),
        small_emote("B"),
        ContentElement::text("غير", ElementFlags::TEXT),
    ]);

    let container = layout.container();
    let visual: Vec<&str> = container
        .elements()
        .iter()
        .map(|element| {
            element
                .text_content()
                .or(element.copy_text.as_deref())
                .unwrap_or_default()
        })
        .collect();
    assert_eq!(visual, vec!["@u", "غير", "B", "A", "ور"]);

    // Mirrored emotes still touch: B ends where A starts.
    let elements = container.elements();
    assert_eq!(elements[2].rect.right(), elements[3].rect.x);
    assert_eq!(x_ranges(&layout), vec![
        (8.0, 24.0),
        (32.0, 56.0),
        (64.0, 80.0),
        (80.0, 96.0),
        (104.0, 120.0),
    ]);
}

#[test]
fn missing_emote_image_falls_back_to_system_text() {
    let fixture = Fixture::new();
    let emote = Emote::new("NotLoaded", ImageSet::single("missing"));
    let layout = fixture.lay_out(vec![ContentElement::emote(emote, EMOTE_FLAGS)]);

    let element = &layout.container().elements()[0];
    assert_eq!(element.text_content(), Some("NotLoaded"));
    assert_eq!(text_color(element), Some(fixture.colors.system));
}

#[test]
fn disabled_emote_images_show_text() {
    let fixture = Fixture::new();
    let ctx = fixture.ctx().with_flags(ElementFlags::TEXT | ElementFlags::CHANNEL_EMOTE_TEXT);
    let layout = fixture.lay_out_with(&ctx, vec![ContentElement::emote(kappa(), EMOTE_FLAGS)]);

    let element = &layout.container().elements()[0];
    assert_eq!(element.text_content(), Some("Kappa"));
    assert_eq!(text_color(element), Some(fixture.colors.regular));
}

#[test]
fn layered_emote_uses_largest_layer() {
    let fixture = Fixture::new();
    let layers = vec![
        Emote::new("Kappa", ImageSet::single("kappa")),
        Emote::new("Hat", ImageSet::single("hat")),
    ];
    let layout = fixture.lay_out(vec![ContentElement::layered_emote(layers, EMOTE_FLAGS)]);

    let element = &layout.container().elements()[0];
    let LayoutKind::LayeredImage { layers } = &element.kind else {
        panic!("expected layered image, got {:?}", element.kind);
    };
    assert_eq!(element.rect.width, 28.0);
    assert_eq!(element.rect.height, 28.0);
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[1].offset.x, 4.0);
    assert_eq!(layers[1].offset.y, 8.0);
    assert_eq!(element.copy_text.as_deref(), Some("Kappa Hat"));
    assert_eq!(element.tooltip, "Kappa\nHat");
}

#[test]
fn animated_emotes_paint_separately() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![
        ContentElement::emote(Emote::new("Party", ImageSet::single("party")), EMOTE_FLAGS),
        ContentElement::emote(kappa(), EMOTE_FLAGS),
    ]);

    let mut still = PaintRecorder::new();
    layout.container().paint_elements(&mut still, 0.0);
    assert_eq!(still.images().len(), 1);

    let mut animated = PaintRecorder::new();
    assert!(layout.container().paint_animated_elements(&mut animated, 0.0));
    assert_eq!(animated.images().len(), 1);
    assert_eq!(animated.images()[0].as_str(), "party");
}

// ============================================================================
// Images and badges
// ============================================================================

#[test]
fn unresolved_image_places_nothing() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::image("missing", ElementFlags::MISC)]);
    assert!(layout.container().elements().is_empty());
}

#[test]
fn scaling_image_picks_resolution() {
    let mut fixture = Fixture::new();
    fixture.images.insert("big", 64.0, 64.0);
    let images = ImageSet {
        x1: Some("kappa".into()),
        x2: None,
        x3: Some("big".into()),
    };
    let ctx = fixture.ctx().with_image_scale(4.0);
    let layout = fixture.lay_out_with(&ctx, vec![ContentElement::scaling_image(images, ElementFlags::MISC)]);

    let LayoutKind::Image { image, .. } = &layout.container().elements()[0].kind else {
        panic!("expected image");
    };
    assert_eq!(image.as_str(), "big");
}

#[test]
fn circular_image_has_padding_and_backdrop() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::circular_image(
        "avatar",
        2.0,
        Color::BLACK,
        ElementFlags::MISC,
    )]);

    let element = &layout.container().elements()[0];
    assert_eq!(element.rect.width, 24.0);
    let LayoutKind::Image { background, .. } = &element.kind else {
        panic!("expected image");
    };
    assert_eq!(
        *background,
        ImageBackground::Circle {
            color: Color::BLACK,
            padding: 2.0
        }
    );

    let mut recorder = PaintRecorder::new();
    layout.container().paint_elements(&mut recorder, 0.0);
    assert!(matches!(recorder.commands()[0], PaintCommand::Ellipse { .. }));
}

#[test]
fn moderator_badge_gets_backdrop() {
    let fixture = Fixture::new();
    let badge = Emote::new("Moderator", ImageSet::single("mod"));
    let layout = fixture.lay_out(vec![ContentElement::badge(
        BadgeKind::Moderator,
        badge,
        ElementFlags::BADGE_CHANNEL_AUTHORITY,
    )]);

    let element = &layout.container().elements()[0];
    let LayoutKind::Image { background, .. } = &element.kind else {
        panic!("expected image");
    };
    assert_eq!(*background, ImageBackground::Rect(fixture.colors.moderator_badge));
}

// ============================================================================
// Text variants
// ============================================================================

#[test]
fn mention_follows_settings() {
    let red = Color::rgb8(255, 0, 0);
    let mention = || ContentElement::mention("@forsen", "forsen", MessageColor::Text, MessageColor::Custom(red));

    let mut fixture = Fixture::new();
    let layout = fixture.lay_out(vec![mention()]);
    let element = &layout.container().elements()[0];
    assert_eq!(text_color(element), Some(red));
    assert!(matches!(
        element.kind,
        LayoutKind::Text {
            style: FontStyle::ChatMedium,
            ..
        }
    ));
    assert_eq!(element.link.as_ref().map(|link| link.kind), Some(LinkKind::UserInfo));

    fixture.settings.colorize_mentions = false;
    fixture.settings.bold_mentions = true;
    let layout = fixture.lay_out(vec![mention()]);
    let element = &layout.container().elements()[0];
    assert_eq!(text_color(element), Some(fixture.colors.regular));
    assert!(matches!(
        element.kind,
        LayoutKind::Text {
            style: FontStyle::ChatMediumBold,
            ..
        }
    ));
}

#[test]
fn timestamp_uses_format_setting() {
    let time = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(9, 5, 30))
        .expect("valid time");

    let mut fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::timestamp(time)]);
    assert_eq!(layout.container().elements()[0].text_content(), Some("09:05"));
    assert!(layout.container().elements()[0].flags.contains(ElementFlags::TIMESTAMP));

    fixture.settings.timestamp_format = "%H:%M:%S".to_string();
    let layout = fixture.lay_out(vec![ContentElement::timestamp(time)]);
    assert_eq!(layout.container().elements()[0].text_content(), Some("09:05:30"));
}

#[test]
fn single_line_text_is_cut_with_ellipsis() {
    let fixture = Fixture::new();
    let ctx = fixture.ctx().with_width(56.0);
    let layout = fixture.lay_out_with(
        &ctx,
        vec![ContentElement::single_line_text(
            "abcdefghij",
            ElementFlags::TEXT,
            MessageColor::Text,
            FontStyle::ChatMedium,
        )],
    );

    let elements = layout.container().elements();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text_content(), Some(format!("ab{ELLIPSIS}").as_str()));
    assert_eq!(layout.container().lines().len(), 1);
}

#[test]
fn username_links_to_user() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::username("Forsen:", "forsen", MessageColor::Text)]);
    let element = &layout.container().elements()[0];
    assert!(element.flags.contains(ElementFlags::USERNAME));
    let link = element.link.as_ref().expect("user link");
    assert_eq!(link.kind, LinkKind::UserInfo);
    assert_eq!(link.value, "forsen");
}

// ============================================================================
// Moderation and replies
// ============================================================================

#[test]
fn moderation_buttons_per_action() {
    let fixture = Fixture::new();
    let ctx = fixture.ctx().with_flags(ElementFlags::DEFAULT | ElementFlags::MODERATOR_TOOLS);
    let layout = fixture.lay_out_with(&ctx, vec![ContentElement::moderation()]);

    let elements = layout.container().elements();
    assert_eq!(elements.len(), fixture.settings.moderation_actions.len());
    for (element, action) in elements.iter().zip(&fixture.settings.moderation_actions) {
        assert!(matches!(element.kind, LayoutKind::TextIcon { .. }));
        assert_eq!(element.rect.width, 16.0);
        let link = element.link.as_ref().expect("action link");
        assert_eq!(link.kind, LinkKind::UserAction);
        assert_eq!(link.value, action.command());
    }
}

#[test]
fn moderation_hidden_without_tools() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![ContentElement::moderation()]);
    assert!(layout.container().elements().is_empty());
}

#[test]
fn reply_curve_and_copy_modes() {
    let fixture = Fixture::new();
    let ctx = fixture.ctx().with_flags(ElementFlags::DEFAULT | ElementFlags::REPLIED_MESSAGE);
    let layout = fixture.lay_out_with(
        &ctx,
        vec![
            ContentElement::reply_curve(),
            ContentElement::text("Replying to @bob", ElementFlags::REPLIED_MESSAGE),
            ContentElement::linebreak(ElementFlags::REPLIED_MESSAGE),
            ContentElement::text("sure", ElementFlags::TEXT),
        ],
    );

    let container = layout.container();
    let curve = &container.elements()[0];
    assert!(matches!(curve.kind, LayoutKind::ReplyCurve { .. }));
    assert_eq!(curve.rect.width, 18.0);
    assert_eq!(curve.selection_index_count(), 1);
    assert_eq!(container.lines().len(), 2);

    let mut all = String::new();
    container.add_selection_text(&mut all, 0, usize::MAX, CopyMode::Everything);
    assert_eq!(all, "Replying to @bob sure ");

    let mut body = String::new();
    container.add_selection_text(&mut body, 0, usize::MAX, CopyMode::EverythingButReplies);
    assert_eq!(body, "sure ");
}

#[test]
fn whole_message_selection_copies_everything() {
    let fixture = Fixture::new();
    let layout = fixture.lay_out(vec![
        ContentElement::text("hi", ElementFlags::TEXT),
        ContentElement::emote(kappa(), EMOTE_FLAGS).with_trailing_space(false),
    ]);

    let last = layout.last_character_index();
    let selection = Selection::whole_message(0, last);
    assert_eq!(selection.max, SelectionItem::new(0, last));
    let text = murmur_layout::selected_text(std::slice::from_ref(&layout), &selection, CopyMode::Everything);
    assert_eq!(text, "hi Kappa");
}

#[test]
fn element_json_export() {
    let element = ContentElement::emote(kappa(), EMOTE_FLAGS);
    let value = element.to_json();
    assert_eq!(value["type"], "emote");
    assert_eq!(value["emote"]["name"], "Kappa");
    assert_eq!(value["flags"], "CHANNEL_EMOTE_IMAGE | CHANNEL_EMOTE_TEXT");
}
