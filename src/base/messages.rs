//! Reply texts the bot sends back to rooms.

use crate::base::types::Person;

/// Usage block sent in response to `help`.
pub const HELP: &str = "```
======================================================================
I am groupbot. I maintain groups. To talk to me say '@Groupbot command'
I understand the following commands:
    create <groupname>
    groupadd <groupname> <person> ...
    groupdel <groupname> <person> ...
    grouplist <groupname>
    delete <groupname>
    list
    tag <groupname> ...
======================================================================";

/// Acknowledgement sent in response to `hello`.
pub const HELLO: &str = "Yes?";

pub const NO_PEOPLE: &str = "Could not identify any people in your message";

pub fn created(group: &str) -> String {
    format!("Created group '{group}'")
}

pub fn already_created(group: &str, count: usize) -> String {
    format!("Group {group} has already been created. It contains {count} people")
}

pub fn not_found(group: &str) -> String {
    format!("Could not find a group named '{group}' for this room.")
}

pub fn invalid_group_name(input: &str) -> String {
    format!("Invalid group name: '{input}'. Must be alphanumeric.")
}

pub fn unknown(text: &str) -> String {
    format!("Sorry, I didn't understand '{text}'")
}

pub fn failure(text: &str) -> String {
    format!("Sorry, something went wrong while handling '{text}'")
}

/// Markdown listing the display names of a group's members.
pub fn group_contents<'a>(group: &str, people: impl IntoIterator<Item = &'a Person>) -> String {
    let mut markdown = format!("Group '{group}' contains: ");

    for person in people {
        markdown.push_str(&person.display_name);
        markdown.push(' ');
    }

    markdown
}

/// Markdown that mentions every given person.
pub fn tag<'a>(people: impl IntoIterator<Item = &'a Person>) -> String {
    let mut markdown = "Hey you'in(s) ".to_string();

    for person in people {
        markdown.push_str(&format!("<@personId:{}|{}> ", person.id, person.display_name));
    }

    markdown
}

pub fn group_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = "Groups available in this room: ".to_string();

    for name in names {
        text.push_str(name);
        text.push(' ');
    }

    text
}
