mod anchors;
mod command;
mod layout;
