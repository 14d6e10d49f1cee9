//
// etherpad-client
// Distributed under terms of the GNU GPLv3 license.
//

#[macro_use]
extern crate log;
extern crate clap;
use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use env_logger::Builder;
use log::LevelFilter;
use etherpad_client::{Client, Error, DEFAULT_API_VERSION};

use std::process;

fn fail(error: Error) -> ! {
    println!("{}", error);
    process::exit(0x0100);
}

fn rev_of(matches: &ArgMatches) -> Option<u64> {
    matches.get_one::<u64>("rev").copied()
}

fn force_of(matches: &ArgMatches) -> Option<bool> {
    matches.get_flag("force").then_some(true)
}

fn pad_arg() -> Arg {
    Arg::new("pad").help("pad ID").required(true)
}

#[tokio::main]
async fn main() {

    let matches = command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .after_help(r#"EXAMPLES:
    Check that the server accepts the configured API key:
      etherpad-client -s http://localhost:9001 -k secret check

    Create a pad with initial text and read it back:
      etherpad-client pad create my-pad --text 'Initial text'
      etherpad-client pad text my-pad

    Create a session valid for eight hours:
      etherpad-client session create g.uGIQRLEntil3YMPj a.qGh5EutnGTyacAJV --hours 8"#)
        .arg(Arg::new("host")
             .short('s')
             .long("server")
             .env("ETHERPAD_URL")
             .default_value("http://localhost:9001")
             .help("URL of Etherpad server"))
        .arg(Arg::new("apikey")
             .short('k')
             .long("apikey")
             .env("ETHERPAD_APIKEY")
             .help("API key of the Etherpad server (APIKEY.txt)"))
        .arg(Arg::new("api-version")
             .short('a')
             .long("api-version")
             .env("ETHERPAD_API_VERSION")
             .default_value(DEFAULT_API_VERSION)
             .help("HTTP API version spoken by the server"))
        .arg(Arg::new("verbosity")
             .short('v')
             .long("verbose")
             .action(ArgAction::Count)
             .help("Sets the level of verbosity"))
        .subcommand(Command::new("check")
                    .about("check that the API key is accepted"))
        .subcommand(Command::new("group")
                    .about("group related commands")
                    .subcommand_required(true)
                    .arg_required_else_help(true)
                    .subcommand(Command::new("create")
                                .about("create a new group"))
                    .subcommand(Command::new("create-for")
                                .about("create a group for an external mapper")
                                .arg_required_else_help(true)
                                .arg(Arg::new("mapper")
                                     .help("external group identifier")
                                     .required(true)))
                    .subcommand(Command::new("delete")
                                .about("delete a group")
                                .arg_required_else_help(true)
                                .arg(Arg::new("group")
                                     .help("group ID")
                                     .required(true)))
                    .subcommand(Command::new("list")
                                .about("list all groups"))
                    .subcommand(Command::new("pads")
                                .about("list the pads of a group")
                                .arg_required_else_help(true)
                                .arg(Arg::new("group")
                                     .help("group ID")
                                     .required(true)))
                    .subcommand(Command::new("create-pad")
                                .about("create a pad inside a group")
                                .arg_required_else_help(true)
                                .arg(Arg::new("group")
                                     .help("group ID")
                                     .required(true))
                                .arg(Arg::new("name")
                                     .help("pad name")
                                     .required(true))
                                .arg(Arg::new("text")
                                     .help("initial pad text")
                                     .short('t')
                                     .long("text"))))
        .subcommand(Command::new("author")
                    .about("author related commands")
                    .subcommand_required(true)
                    .arg_required_else_help(true)
                    .subcommand(Command::new("create")
                                .about("create a new author")
                                .arg(Arg::new("name")
                                     .help("author display name")
                                     .short('n')
                                     .long("name")))
                    .subcommand(Command::new("create-for")
                                .about("create an author for an external mapper")
                                .arg_required_else_help(true)
                                .arg(Arg::new("mapper")
                                     .help("external author identifier")
                                     .required(true))
                                .arg(Arg::new("name")
                                     .help("author display name")
                                     .short('n')
                                     .long("name")))
                    .subcommand(Command::new("name")
                                .about("show the display name of an author")
                                .arg_required_else_help(true)
                                .arg(Arg::new("author")
                                     .help("author ID")
                                     .required(true)))
                    .subcommand(Command::new("pads")
                                .about("list the pads an author contributed to")
                                .arg_required_else_help(true)
                                .arg(Arg::new("author")
                                     .help("author ID")
                                     .required(true))))
        .subcommand(Command::new("session")
                    .about("session related commands")
                    .subcommand_required(true)
                    .arg_required_else_help(true)
                    .subcommand(Command::new("create")
                                .about("create a session between a group and an author")
                                .arg_required_else_help(true)
                                .arg(Arg::new("group")
                                     .help("group ID")
                                     .required(true))
                                .arg(Arg::new("author")
                                     .help("author ID")
                                     .required(true))
                                .arg(Arg::new("hours")
                                     .help("session duration in hours [default: 24]")
                                     .short('H')
                                     .long("hours")
                                     .value_parser(value_parser!(u32))))
                    .subcommand(Command::new("delete")
                                .about("delete a session")
                                .arg_required_else_help(true)
                                .arg(Arg::new("session")
                                     .help("session ID")
                                     .required(true)))
                    .subcommand(Command::new("info")
                                .about("show group, author and expiry of a session")
                                .arg_required_else_help(true)
                                .arg(Arg::new("session")
                                     .help("session ID")
                                     .required(true)))
                    .subcommand(Command::new("of-group")
                                .about("list the sessions of a group")
                                .arg_required_else_help(true)
                                .arg(Arg::new("group")
                                     .help("group ID")
                                     .required(true)))
                    .subcommand(Command::new("of-author")
                                .about("list the sessions of an author")
                                .arg_required_else_help(true)
                                .arg(Arg::new("author")
                                     .help("author ID")
                                     .required(true))))
        .subcommand(Command::new("pad")
                    .about("pad related commands")
                    .subcommand_required(true)
                    .arg_required_else_help(true)
                    .subcommand(Command::new("create")
                                .about("create a new pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("text")
                                     .help("initial pad text")
                                     .short('t')
                                     .long("text")))
                    .subcommand(Command::new("delete")
                                .about("delete a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg()))
                    .subcommand(Command::new("text")
                                .about("print the text of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("rev")
                                     .help("revision to read")
                                     .short('r')
                                     .long("rev")
                                     .value_parser(value_parser!(u64))))
                    .subcommand(Command::new("set-text")
                                .about("replace the text of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("text")
                                     .help("new pad text")
                                     .required(true)))
                    .subcommand(Command::new("append")
                                .about("append text to a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("text")
                                     .help("text to append")
                                     .required(true)))
                    .subcommand(Command::new("html")
                                .about("print the HTML of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("rev")
                                     .help("revision to read")
                                     .short('r')
                                     .long("rev")
                                     .value_parser(value_parser!(u64))))
                    .subcommand(Command::new("set-html")
                                .about("replace the HTML of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("html")
                                     .help("new pad HTML")
                                     .required(true)))
                    .subcommand(Command::new("list")
                                .about("list all pads"))
                    .subcommand(Command::new("exists")
                                .about("check whether a pad exists")
                                .arg_required_else_help(true)
                                .arg(pad_arg()))
                    .subcommand(Command::new("revisions")
                                .about("print the revision count of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg()))
                    .subcommand(Command::new("copy")
                                .about("copy a pad")
                                .arg_required_else_help(true)
                                .arg(Arg::new("source")
                                     .help("source pad ID")
                                     .required(true))
                                .arg(Arg::new("destination")
                                     .help("destination pad ID")
                                     .required(true))
                                .arg(Arg::new("force")
                                     .help("overwrite the destination if it exists")
                                     .short('f')
                                     .long("force")
                                     .action(ArgAction::SetTrue)))
                    .subcommand(Command::new("move")
                                .about("move a pad")
                                .arg_required_else_help(true)
                                .arg(Arg::new("source")
                                     .help("source pad ID")
                                     .required(true))
                                .arg(Arg::new("destination")
                                     .help("destination pad ID")
                                     .required(true))
                                .arg(Arg::new("force")
                                     .help("overwrite the destination if it exists")
                                     .short('f')
                                     .long("force")
                                     .action(ArgAction::SetTrue)))
                    .subcommand(Command::new("users")
                                .about("list the users currently editing a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg()))
                    .subcommand(Command::new("readonly-id")
                                .about("print the read-only ID of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg()))
                    .subcommand(Command::new("last-edited")
                                .about("print the last edit timestamp of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())))
        .subcommand(Command::new("chat")
                    .about("chat related commands")
                    .subcommand_required(true)
                    .arg_required_else_help(true)
                    .subcommand(Command::new("head")
                                .about("print the index of the latest chat message")
                                .arg_required_else_help(true)
                                .arg(pad_arg()))
                    .subcommand(Command::new("history")
                                .about("print the chat history of a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("start")
                                     .help("first message index")
                                     .long("start")
                                     .value_parser(value_parser!(u64))
                                     .requires("end"))
                                .arg(Arg::new("end")
                                     .help("last message index")
                                     .long("end")
                                     .value_parser(value_parser!(u64))
                                     .requires("start")))
                    .subcommand(Command::new("append")
                                .about("append a chat message to a pad")
                                .arg_required_else_help(true)
                                .arg(pad_arg())
                                .arg(Arg::new("author")
                                     .help("author ID")
                                     .required(true))
                                .arg(Arg::new("text")
                                     .help("message text")
                                     .required(true))))
        .get_matches();

    // Configure loglevel
    match matches.get_count("verbosity") {
        0 => Builder::new().filter_level(LevelFilter::Off).init(),
        1 => Builder::new().filter_level(LevelFilter::Info).init(),
        2 => Builder::new().filter_level(LevelFilter::Debug).init(),
        _ => Builder::new().filter_level(LevelFilter::Trace).init()
    };

    // Safe to unwrap because they have default values
    let host = matches.get_one::<String>("host").unwrap();
    let api_version = matches.get_one::<String>("api-version").unwrap();
    let api_key = match matches.get_one::<String>("apikey") {
        Some(api_key) => api_key.to_string(),
        None => {
            println!("You must provide the API key (--apikey or ETHERPAD_APIKEY)");
            process::exit(0x0100);
        }
    };

    info!("Log level {:?}", log::max_level());
    trace!("Using {} as ETHERPAD_URL", host);

    // Configure client, validates the server URL
    let client = match Client::with_api_version(host, api_key, api_version) {
        Ok(client) => client,
        Err(_) => {
            println!("ETHERPAD_URL {} is not a valid URL", host);
            process::exit(0x0100);
        }
    };

    match matches.subcommand() {
        Some(("check", _)) => {
            match client.check_token().await {
                Ok(()) => println!("API key accepted"),
                Err(err) => fail(err)
            }
        },
        Some(("group", group_sub_matches)) => {
            match group_sub_matches.subcommand() {
                Some(("create", _)) => {
                    match client.create_group().await {
                        Ok(group) => println!("{}", group.group_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("create-for", sub_matches)) => {
                    let mapper = sub_matches.get_one::<String>("mapper").unwrap();
                    match client.create_group_if_not_exists_for(mapper).await {
                        Ok(group) => println!("{}", group.group_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("delete", sub_matches)) => {
                    let group = sub_matches.get_one::<String>("group").unwrap();
                    match client.delete_group(group).await {
                        Ok(()) => println!("Group {} deleted", group),
                        Err(err) => fail(err)
                    }
                },
                Some(("list", _)) => {
                    match client.list_all_groups().await {
                        Ok(groups) => {
                            for group_id in groups.group_ids.iter() {
                                println!("{}", group_id);
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("pads", sub_matches)) => {
                    let group = sub_matches.get_one::<String>("group").unwrap();
                    match client.list_pads(group).await {
                        Ok(pads) => {
                            for pad_id in pads.pad_ids.iter() {
                                println!("{}", pad_id);
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("create-pad", sub_matches)) => {
                    let group = sub_matches.get_one::<String>("group").unwrap();
                    let name = sub_matches.get_one::<String>("name").unwrap();
                    let text = sub_matches.get_one::<String>("text").map(|text| text.as_str());
                    match client.create_group_pad(group, name, text).await {
                        Ok(pad) => println!("{}", pad.pad_id),
                        Err(err) => fail(err)
                    }
                },
                _ => unreachable!()
            };
        },
        Some(("author", author_sub_matches)) => {
            match author_sub_matches.subcommand() {
                Some(("create", sub_matches)) => {
                    let name = sub_matches.get_one::<String>("name").map(|name| name.as_str());
                    match client.create_author(name).await {
                        Ok(author) => println!("{}", author.author_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("create-for", sub_matches)) => {
                    let mapper = sub_matches.get_one::<String>("mapper").unwrap();
                    let name = sub_matches.get_one::<String>("name").map(|name| name.as_str());
                    match client.create_author_if_not_exists_for(mapper, name).await {
                        Ok(author) => println!("{}", author.author_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("name", sub_matches)) => {
                    let author = sub_matches.get_one::<String>("author").unwrap();
                    match client.get_author_name(author).await {
                        Ok(name) => println!("{}", name),
                        Err(err) => fail(err)
                    }
                },
                Some(("pads", sub_matches)) => {
                    let author = sub_matches.get_one::<String>("author").unwrap();
                    match client.list_pads_of_author(author).await {
                        Ok(pads) => {
                            for pad_id in pads.pad_ids.iter() {
                                println!("{}", pad_id);
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                _ => unreachable!()
            };
        },
        Some(("session", session_sub_matches)) => {
            match session_sub_matches.subcommand() {
                Some(("create", sub_matches)) => {
                    let group = sub_matches.get_one::<String>("group").unwrap();
                    let author = sub_matches.get_one::<String>("author").unwrap();
                    let hours: u32 = *sub_matches.get_one("hours").unwrap_or(&24);
                    match client.create_session_with_duration(group, author, hours).await {
                        Ok(session) => println!("{}", session.session_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("delete", sub_matches)) => {
                    let session = sub_matches.get_one::<String>("session").unwrap();
                    match client.delete_session(session).await {
                        Ok(()) => println!("Session {} deleted", session),
                        Err(err) => fail(err)
                    }
                },
                Some(("info", sub_matches)) => {
                    let session = sub_matches.get_one::<String>("session").unwrap();
                    match client.get_session_info(session).await {
                        Ok(info) => {
                            println!("Group: {}", info.group_id);
                            println!("Author: {}", info.author_id);
                            println!("Valid until: {}", info.valid_until);
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("of-group", sub_matches)) => {
                    let group = sub_matches.get_one::<String>("group").unwrap();
                    match client.list_sessions_of_group(group).await {
                        Ok(sessions) => {
                            for (session_id, info) in sessions.iter() {
                                match info {
                                    Some(info) => println!("{} (author {}, valid until {})", session_id, info.author_id, info.valid_until),
                                    None => println!("{} (deleted)", session_id)
                                }
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("of-author", sub_matches)) => {
                    let author = sub_matches.get_one::<String>("author").unwrap();
                    match client.list_sessions_of_author(author).await {
                        Ok(sessions) => {
                            for (session_id, info) in sessions.iter() {
                                match info {
                                    Some(info) => println!("{} (group {}, valid until {})", session_id, info.group_id, info.valid_until),
                                    None => println!("{} (deleted)", session_id)
                                }
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                _ => unreachable!()
            };
        },
        Some(("pad", pad_sub_matches)) => {
            match pad_sub_matches.subcommand() {
                Some(("create", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    let text = sub_matches.get_one::<String>("text").map(|text| text.as_str());
                    match client.create_pad(pad, text).await {
                        Ok(()) => println!("Pad {} created", pad),
                        Err(err) => fail(err)
                    }
                },
                Some(("delete", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.delete_pad(pad).await {
                        Ok(()) => println!("Pad {} deleted", pad),
                        Err(err) => fail(err)
                    }
                },
                Some(("text", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.get_text(pad, rev_of(sub_matches)).await {
                        Ok(text) => print!("{}", text.text),
                        Err(err) => fail(err)
                    }
                },
                Some(("set-text", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    let text = sub_matches.get_one::<String>("text").unwrap();
                    match client.set_text(pad, text).await {
                        Ok(()) => println!("Text of pad {} replaced", pad),
                        Err(err) => fail(err)
                    }
                },
                Some(("append", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    let text = sub_matches.get_one::<String>("text").unwrap();
                    match client.append_text(pad, text).await {
                        Ok(()) => println!("Text appended to pad {}", pad),
                        Err(err) => fail(err)
                    }
                },
                Some(("html", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.get_html(pad, rev_of(sub_matches)).await {
                        Ok(html) => println!("{}", html.html),
                        Err(err) => fail(err)
                    }
                },
                Some(("set-html", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    let html = sub_matches.get_one::<String>("html").unwrap();
                    match client.set_html(pad, html).await {
                        Ok(()) => println!("HTML of pad {} replaced", pad),
                        Err(err) => fail(err)
                    }
                },
                Some(("list", _)) => {
                    match client.list_all_pads().await {
                        Ok(pads) => {
                            for pad_id in pads.pad_ids.iter() {
                                println!("{}", pad_id);
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("exists", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.pad_exists(pad).await {
                        Ok(true) => println!("Pad {} exists", pad),
                        Ok(false) => {
                            println!("Pad {} does not exist", pad);
                            process::exit(0x0100);
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("revisions", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.get_revisions_count(pad).await {
                        Ok(count) => println!("{}", count.revisions),
                        Err(err) => fail(err)
                    }
                },
                Some(("copy", sub_matches)) => {
                    let source = sub_matches.get_one::<String>("source").unwrap();
                    let destination = sub_matches.get_one::<String>("destination").unwrap();
                    match client.copy_pad(source, destination, force_of(sub_matches)).await {
                        Ok(pad) => println!("{}", pad.pad_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("move", sub_matches)) => {
                    let source = sub_matches.get_one::<String>("source").unwrap();
                    let destination = sub_matches.get_one::<String>("destination").unwrap();
                    match client.move_pad(source, destination, force_of(sub_matches)).await {
                        Ok(()) => println!("Pad {} moved to {}", source, destination),
                        Err(err) => fail(err)
                    }
                },
                Some(("users", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.pad_users(pad).await {
                        Ok(users) => {
                            if users.pad_users.is_empty() {
                                println!("Nobody is editing pad {}", pad);
                            } else {
                                for user in users.pad_users.iter() {
                                    println!("{} {}", user.id, user.name.as_deref().unwrap_or("(anonymous)"));
                                }
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("readonly-id", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.get_read_only_id(pad).await {
                        Ok(id) => println!("{}", id.read_only_id),
                        Err(err) => fail(err)
                    }
                },
                Some(("last-edited", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.get_last_edited(pad).await {
                        Ok(last) => println!("{}", last.last_edited),
                        Err(err) => fail(err)
                    }
                },
                _ => unreachable!()
            };
        },
        Some(("chat", chat_sub_matches)) => {
            match chat_sub_matches.subcommand() {
                Some(("head", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    match client.get_chat_head(pad).await {
                        Ok(head) => println!("{}", head.chat_head),
                        Err(err) => fail(err)
                    }
                },
                Some(("history", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    let start = sub_matches.get_one::<u64>("start").copied();
                    let end = sub_matches.get_one::<u64>("end").copied();
                    let history = match (start, end) {
                        (Some(start), Some(end)) => client.get_chat_history_range(pad, start, end).await,
                        _ => client.get_chat_history(pad).await
                    };
                    match history {
                        Ok(history) => {
                            for message in history.messages.iter() {
                                println!("[{}] {}: {}", message.time, message.user_name.as_deref().unwrap_or(&message.user_id), message.text);
                            }
                        },
                        Err(err) => fail(err)
                    }
                },
                Some(("append", sub_matches)) => {
                    let pad = sub_matches.get_one::<String>("pad").unwrap();
                    let author = sub_matches.get_one::<String>("author").unwrap();
                    let text = sub_matches.get_one::<String>("text").unwrap();
                    match client.append_chat_message(pad, text, author, None).await {
                        Ok(()) => println!("Message appended to pad {}", pad),
                        Err(err) => fail(err)
                    }
                },
                _ => unreachable!()
            };
        },
        _ => unreachable!()
    };
}
