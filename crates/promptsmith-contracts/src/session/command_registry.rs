#[derive(Clone, Copy, Debug)]
pub(crate) struct CommandSpec {
    pub command: &'static str,
    pub action: &'static str,
    pub arg: &'static str,
}

/// Commands whose whole remainder is one argument.
pub(crate) const RAW_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "select",
        action: "toggle_model",
        arg: "model",
    },
    CommandSpec {
        command: "prompt",
        action: "set_prompt",
        arg: "prompt",
    },
    CommandSpec {
        command: "template",
        action: "use_template",
        arg: "template",
    },
    CommandSpec {
        command: "theme",
        action: "set_theme",
        arg: "theme",
    },
    CommandSpec {
        command: "task_add",
        action: "add_task",
        arg: "text",
    },
    CommandSpec {
        command: "task_done",
        action: "toggle_task",
        arg: "id",
    },
    CommandSpec {
        command: "task_delete",
        action: "delete_task",
        arg: "id",
    },
    CommandSpec {
        command: "example_delete",
        action: "delete_example",
        arg: "id",
    },
    CommandSpec {
        command: "gallery_delete",
        action: "delete_image",
        arg: "id",
    },
];

/// Commands taking an id followed by free text.
pub(crate) const ID_TEXT_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "task_edit",
        action: "edit_task",
        arg: "text",
    },
    CommandSpec {
        command: "gallery_rename",
        action: "rename_image",
        arg: "prompt",
    },
];

pub(crate) const NO_ARG_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        command: "help",
        action: "help",
        arg: "",
    },
    CommandSpec {
        command: "models",
        action: "list_models",
        arg: "",
    },
    CommandSpec {
        command: "status",
        action: "status",
        arg: "",
    },
    CommandSpec {
        command: "optimize",
        action: "optimize",
        arg: "",
    },
    CommandSpec {
        command: "templates",
        action: "list_templates",
        arg: "",
    },
    CommandSpec {
        command: "tasks",
        action: "list_tasks",
        arg: "",
    },
    CommandSpec {
        command: "examples",
        action: "list_examples",
        arg: "",
    },
    CommandSpec {
        command: "example_add",
        action: "add_example",
        arg: "",
    },
    CommandSpec {
        command: "gallery",
        action: "list_gallery",
        arg: "",
    },
    CommandSpec {
        command: "gallery_clear",
        action: "clear_gallery",
        arg: "",
    },
    CommandSpec {
        command: "quit",
        action: "quit",
        arg: "",
    },
    CommandSpec {
        command: "exit",
        action: "quit",
        arg: "",
    },
];

pub(crate) const IMAGE_COMMAND: CommandSpec = CommandSpec {
    command: "image",
    action: "generate_image",
    arg: "prompt",
};

pub(crate) const IMAGE_OPTIMIZED_COMMAND: CommandSpec = CommandSpec {
    command: "image_optimized",
    action: "generate_image_from_optimized",
    arg: "aspect_ratio",
};

pub(crate) const ANALYZE_COMMAND: CommandSpec = CommandSpec {
    command: "analyze",
    action: "analyze_image",
    arg: "question",
};

pub(crate) const EXAMPLE_SET_COMMAND: CommandSpec = CommandSpec {
    command: "example_set",
    action: "update_example",
    arg: "",
};

pub const SESSION_HELP_COMMANDS: &[&str] = &[
    "/models",
    "/select <model>",
    "/prompt <text>",
    "/templates",
    "/template <name>",
    "/optimize",
    "/image [ratio] <prompt>",
    "/image_optimized [ratio]",
    "/analyze <path> <question>",
    "/tasks",
    "/task_add <text>",
    "/task_done <id>",
    "/task_edit <id> <text>",
    "/task_delete <id>",
    "/examples",
    "/example_add",
    "/example_set <id> \"<input>\" \"<output>\"",
    "/example_delete <id>",
    "/gallery",
    "/gallery_rename <id> <prompt>",
    "/gallery_delete <id>",
    "/gallery_clear",
    "/theme <light|dark|gray>",
    "/status",
    "/quit",
];
