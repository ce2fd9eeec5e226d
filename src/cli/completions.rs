use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    provisor completions bash > ~/.bash_completion.d/provisor\n\n\
                  Generate zsh completions:\n    provisor completions zsh > ~/.zfunc/_provisor\n\n\
                  Generate fish completions:\n    provisor completions fish > ~/.config/fish/completions/provisor.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
