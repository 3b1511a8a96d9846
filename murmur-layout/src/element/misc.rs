//! Moderation buttons and the reply curve.

use crate::context::RenderingContext;
use crate::layout::{LayoutContainer, LayoutElement};
use crate::link::{Link, LinkKind};
use crate::primitives::Size;
use crate::settings::ModerationAction;

use super::ContentElement;

/// Side of a moderation button, unscaled.
const MODERATION_BUTTON_SIZE: f32 = 16.0;

const REPLY_CURVE_WIDTH: f32 = 18.0;
const REPLY_CURVE_THICKNESS: f32 = 1.5;
const REPLY_CURVE_RADIUS: f32 = 6.0;
const REPLY_CURVE_MARGIN: f32 = 2.0;

pub(super) fn add_moderation(
    owner: &ContentElement,
    container: &mut LayoutContainer,
    ctx: &RenderingContext<'_>,
) {
    let side = MODERATION_BUTTON_SIZE * ctx.scale;
    let size = Size::new(side, side);

    for action in &ctx.settings.moderation_actions {
        let element = match action {
            ModerationAction::Image { image, .. } => {
                match ctx.images.resolve(image, ctx.image_scale) {
                    Some(image) => LayoutElement::image(&image, size),
                    None => continue,
                }
            }
            ModerationAction::Text { line1, line2, .. } => {
                LayoutElement::text_icon(line1.as_str(), line2.as_str(), size, ctx.colors.system)
            }
        };
        container.add_element(
            element
                .with_flags(owner.flags)
                .with_link(Some(Link::new(LinkKind::UserAction, action.command())))
                .with_trailing_space(owner.trailing_space),
        );
    }
}

pub(super) fn add_reply_curve(
    owner: &ContentElement,
    container: &mut LayoutContainer,
    ctx: &RenderingContext<'_>,
) {
    let element = LayoutElement::reply_curve(
        REPLY_CURVE_WIDTH * ctx.scale,
        REPLY_CURVE_THICKNESS * ctx.scale,
        REPLY_CURVE_RADIUS * ctx.scale,
        REPLY_CURVE_MARGIN * ctx.scale,
        ctx.colors.system,
    )
    .with_flags(owner.flags)
    .with_link(owner.link.clone())
    .with_trailing_space(false);
    container.add_element(element);
}
