pub mod discussion_view;
