// SPDX-FileCopyrightText: 2026 Wicket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command definitions and option extraction.
//!
//! Command names are the same wire tags the router dispatches on, so a
//! slash command and the matching button funnel through one handler.

use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, ResolvedValue,
};

use wicket_router::Payload;

/// The fixed command set, registered per guild at `ready`.
pub fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("ticket_setup")
            .description("Post the ticket menu to a channel")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Channel,
                    "channel",
                    "Channel to post the ticket menu into",
                )
                .required(true),
            ),
        CreateCommand::new("ticket_close")
            .description("Close the current ticket thread")
            .add_option(CreateCommandOption::new(
                CommandOptionType::String,
                "reason",
                "Optional reason for closing",
            )),
        CreateCommand::new("ticket_claim").description("Claim this ticket as staff"),
        CreateCommand::new("ticket_transcript")
            .description("Generate and send the transcript for this ticket"),
        CreateCommand::new("ticket_add")
            .description("Add a member to the ticket thread (staff only)")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "Member to add to the ticket thread",
                )
                .required(true),
            ),
        CreateCommand::new("ticket_remove")
            .description("Remove a member from the ticket thread (staff only)")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::User,
                    "member",
                    "Member to remove from the ticket thread",
                )
                .required(true),
            ),
        CreateCommand::new("ticket_lock").description("Lock or unlock the ticket (staff only)"),
        CreateCommand::new("admin_panel").description("Open the ticket admin panel (staff only)"),
    ]
}

/// Extract the router payload from a command's resolved options.
pub fn payload_for(cmd: &CommandInteraction) -> Payload {
    for option in cmd.data.options() {
        match option.value {
            ResolvedValue::User(user, _) => {
                return Payload::Member {
                    user_id: user.id.to_string(),
                }
            }
            ResolvedValue::String(s) => {
                return Payload::Text {
                    value: s.to_string(),
                }
            }
            _ => {}
        }
    }
    Payload::None
}

/// The channel option of `ticket_setup`, if present.
pub fn channel_option(cmd: &CommandInteraction) -> Option<serenity::all::ChannelId> {
    for option in cmd.data.options() {
        if let ResolvedValue::Channel(channel) = option.value {
            return Some(channel.id);
        }
    }
    None
}
