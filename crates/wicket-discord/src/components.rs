// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embed and component builders.
//!
//! Every control's `custom_id` is the wire form of its [`ControlTag`] and
//! nothing else; which ticket a control belongs to is never encoded here.

use serenity::all::{
    ButtonStyle, Colour, CreateActionRow, CreateButton, CreateEmbed, CreateInputText,
    CreateModal, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption,
    InputTextStyle, Timestamp,
};

use wicket_core::types::TicketCategory;
use wicket_router::ControlTag;

pub const EMBED_COLOUR: Colour = Colour::new(0x5865F2);

/// The standard ephemeral reply embed.
pub fn make_embed(title: &str, description: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(EMBED_COLOUR)
        .timestamp(Timestamp::now())
}

/// The category select menu posted by `ticket_setup`.
pub fn category_select_row() -> CreateActionRow {
    let options = [
        TicketCategory::Purchase,
        TicketCategory::Staff,
        TicketCategory::Other,
    ]
    .into_iter()
    .map(|c| CreateSelectMenuOption::new(c.label(), c.to_string()).description(c.blurb()))
    .collect();

    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(
            ControlTag::TicketSelect.to_string(),
            CreateSelectMenuKind::String { options },
        )
        .placeholder("Choose a reason for your ticket")
        .min_values(1)
        .max_values(1),
    )
}

/// The persistent thread-control row on the welcome message.
pub fn thread_controls_row() -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(ControlTag::TicketClose.to_string())
            .label("Close")
            .style(ButtonStyle::Danger),
        CreateButton::new(ControlTag::TicketClaim.to_string())
            .label("Claim")
            .style(ButtonStyle::Secondary),
        CreateButton::new(ControlTag::TicketTranscript.to_string())
            .label("Transcript")
            .style(ButtonStyle::Primary),
        CreateButton::new(ControlTag::TicketLock.to_string())
            .label("Lock")
            .style(ButtonStyle::Secondary),
    ])
}

/// Controls attached to the admin panel reply.
pub fn admin_panel_rows() -> Vec<CreateActionRow> {
    vec![CreateActionRow::Buttons(vec![
        CreateButton::new(ControlTag::AdminDeleteThread.to_string())
            .label("Delete ticket")
            .style(ButtonStyle::Danger),
        CreateButton::new(ControlTag::AdminSetTranscriptChannel.to_string())
            .label("Set transcript channel")
            .style(ButtonStyle::Secondary),
    ])]
}

/// The delete confirm/cancel pair.
pub fn confirm_delete_row() -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(ControlTag::AdminConfirmDelete.to_string())
            .label("Delete")
            .style(ButtonStyle::Danger),
        CreateButton::new(ControlTag::AdminCancelDelete.to_string())
            .label("Cancel")
            .style(ButtonStyle::Secondary),
    ])
}

/// The confirm/cancel pair after its lifetime expired.
pub fn expired_confirm_row() -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(ControlTag::AdminConfirmDelete.to_string())
            .label("Delete")
            .style(ButtonStyle::Danger)
            .disabled(true),
        CreateButton::new(ControlTag::AdminCancelDelete.to_string())
            .label("Cancel")
            .style(ButtonStyle::Secondary)
            .disabled(true),
    ])
}

/// The transcript-channel modal. Its `custom_id` is the submit tag.
pub fn transcript_channel_modal() -> CreateModal {
    CreateModal::new(
        ControlTag::AdminTranscriptChannelModal.to_string(),
        "Set transcript channel",
    )
    .components(vec![CreateActionRow::InputText(
        CreateInputText::new(InputTextStyle::Short, "Channel", "channel_ref")
            .placeholder("#channel, channel id, or exact name")
            .required(true),
    )])
}
