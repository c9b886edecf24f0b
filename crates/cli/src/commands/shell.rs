//! Interactive storefront session.
//!
//! Keeps one [`Shop`] alive, applies each typed command, then renders the
//! current view.

use std::io::Write;

use rust_decimal::Decimal;
use telshop_core::{Telephone, TelephoneId, TelephoneStatus};
use telshop_storefront::cart::CartStore;
use telshop_storefront::catalog::CatalogFilter;
use telshop_storefront::config::ShopConfig;
use telshop_storefront::view::{Navigation, View};
use telshop_storefront::{FilterSource, Shop};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use super::{cart::resolve_line, checkout, open_shop};
use crate::render;

const HELP: &str = "\
Commands:
  list | home            show the catalog
  refresh                reload the catalog
  filter key=value ...   model, brand, color, status, max-price, storage, processor, search
  open <id>              show a telephone
  add [id]               add a telephone (default: the one open)
  buy [id]               replace the cart with one telephone
  cart                   show the cart
  remove <line>          remove a cart line
  qty <line> <n>         set a line's quantity (0 removes)
  clear                  empty the cart
  checkout               go to the order form
  submit                 enter delivery details and place the order
  back                   previous screen
  help                   this text
  quit                   leave";

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Home,
    Refresh,
    Filter(CatalogFilter),
    Open(TelephoneId),
    Add(Option<TelephoneId>),
    Buy(Option<TelephoneId>),
    Cart,
    Remove(String),
    Quantity(String, i64),
    Clear,
    Checkout,
    Submit,
    Back,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("list" | "home", []) => ShellCommand::Home,
        ("refresh", []) => ShellCommand::Refresh,
        ("filter", args) => ShellCommand::Filter(parse_filter(args)?),
        ("open", [id]) => ShellCommand::Open(parse_id(id)?),
        ("add", []) => ShellCommand::Add(None),
        ("add", [id]) => ShellCommand::Add(Some(parse_id(id)?)),
        ("buy", []) => ShellCommand::Buy(None),
        ("buy", [id]) => ShellCommand::Buy(Some(parse_id(id)?)),
        ("cart", []) => ShellCommand::Cart,
        ("remove", [line]) => ShellCommand::Remove((*line).to_string()),
        ("qty", [line, quantity]) => ShellCommand::Quantity(
            (*line).to_string(),
            quantity
                .parse()
                .map_err(|_| format!("invalid quantity: {quantity}"))?,
        ),
        ("clear", []) => ShellCommand::Clear,
        ("checkout", []) => ShellCommand::Checkout,
        ("submit", []) => ShellCommand::Submit,
        ("back", []) => ShellCommand::Back,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit", _) => ShellCommand::Quit,
        _ => return Err(format!("unknown command: {line}; type `help`")),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str) -> Result<TelephoneId, String> {
    raw.parse().map_err(|_| format!("invalid telephone id: {raw}"))
}

fn parse_filter(args: &[&str]) -> Result<CatalogFilter, String> {
    let mut filter = CatalogFilter::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got {arg}"))?;
        let value = value.to_string();
        match key {
            "model" => filter.model = Some(value),
            "brand" => filter.brand = Some(value),
            "color" => filter.color = Some(value),
            "status" => filter.status = Some(value.parse::<TelephoneStatus>()?),
            "max-price" | "price" => {
                filter.max_price = Some(
                    value
                        .parse::<Decimal>()
                        .map_err(|_| format!("invalid price: {value}"))?,
                );
            }
            "storage" => filter.storage = Some(value),
            "processor" => filter.processor = Some(value),
            "search" => filter.search_term = Some(value),
            _ => return Err(format!("unknown filter field: {key}")),
        }
    }
    Ok(filter)
}

/// What the list and detail screens show.
#[derive(Default)]
struct Screen {
    /// Filter results; `None` shows the whole catalog.
    listing: Option<Vec<Telephone>>,
    product: Option<Telephone>,
}

/// Run the shell on stdin until `quit` or end of input.
pub async fn run(config: &ShopConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut shop = open_shop(config)?;
    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();

    if let Err(e) = shop.refresh_catalog().await {
        writeln!(out, "Could not load the catalog: {e}")?;
    }
    render_view(&mut out, &shop, &screen, config)?;

    loop {
        write!(out, "[{}]> ", shop.view())?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            command => {
                if let Err(e) = apply(&mut shop, &mut screen, command, &mut lines, &mut out).await {
                    writeln!(out, "{e}")?;
                }
            }
        }
        render_view(&mut out, &shop, &screen, config)?;
    }
    Ok(())
}

async fn apply<S, R>(
    shop: &mut Shop<S>,
    screen: &mut Screen,
    command: ShellCommand,
    lines: &mut Lines<R>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: CartStore,
    R: AsyncBufRead + Unpin,
{
    match command {
        ShellCommand::Home => {
            screen.listing = None;
            shop.navigate(Navigation::Logo);
        }
        ShellCommand::Refresh => {
            shop.refresh_catalog().await?;
            screen.listing = None;
        }
        ShellCommand::Filter(filter) => {
            let (telephones, source) = shop.filter_catalog(&filter).await;
            if source == FilterSource::Local {
                writeln!(out, "(filtered locally)")?;
            }
            screen.listing = Some(telephones);
            shop.navigate(Navigation::Logo);
        }
        ShellCommand::Open(id) => {
            screen.product = None;
            screen.product = Some(shop.open_product(id).await?);
        }
        ShellCommand::Add(id) => {
            let id = id.or_else(|| shop.selected()).ok_or("Which telephone? Use `add <id>`")?;
            shop.add_to_cart(id).await?;
            writeln!(out, "Added to cart.")?;
        }
        ShellCommand::Buy(id) => {
            let id = id.or_else(|| shop.selected()).ok_or("Which telephone? Use `buy <id>`")?;
            shop.buy_now(id).await?;
        }
        ShellCommand::Cart => {
            shop.navigate(Navigation::CartIcon);
        }
        ShellCommand::Remove(reference) => {
            let line_id = resolve_line(shop.cart(), &reference)?;
            shop.remove_line(line_id)?;
        }
        ShellCommand::Quantity(reference, quantity) => {
            let line_id = resolve_line(shop.cart(), &reference)?;
            shop.set_line_quantity(line_id, quantity)?;
        }
        ShellCommand::Clear => {
            shop.clear_cart()?;
        }
        ShellCommand::Checkout => {
            shop.navigate(Navigation::Checkout);
        }
        ShellCommand::Submit => {
            shop.navigate(Navigation::Checkout);
            let full_name = prompt(lines, out, "Full name").await?;
            let phone = prompt(lines, out, "Phone (+375XXXXXXXXX)").await?;
            let address = prompt(lines, out, "Delivery address").await?;
            let form = checkout::delivery_form(&full_name, &phone, &address);
            checkout::place_order(shop, &form, out).await?;
            screen.listing = None;
        }
        ShellCommand::Back => {
            shop.navigate(Navigation::Back);
        }
        ShellCommand::Help | ShellCommand::Quit => {}
    }
    Ok(())
}

async fn prompt<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    out: &mut impl Write,
    label: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    write!(out, "{label}: ")?;
    out.flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}

fn render_view<S: CartStore>(
    out: &mut impl Write,
    shop: &Shop<S>,
    screen: &Screen,
    config: &ShopConfig,
) -> std::io::Result<()> {
    writeln!(out)?;
    match shop.view() {
        View::List => render::catalog(
            out,
            screen
                .listing
                .as_deref()
                .unwrap_or_else(|| shop.catalog().telephones()),
        ),
        View::Detail => match &screen.product {
            Some(telephone) => render::telephone_detail(out, telephone, config),
            None => writeln!(out, "Telephone not available."),
        },
        View::Cart => render::cart(out, shop.cart()),
        View::Order => {
            render::order_summary(out, &shop.order_summary())?;
            writeln!(out, "Type `submit` to enter delivery details.")
        }
    }
}
