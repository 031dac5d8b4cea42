//! Badge bring-up: pin assignments, clocks and the display panel.

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    assign_resources,
    clock::{
        Clock,
        CpuClock,
    },
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    rom,
    spi::master::Spi,
    time::Rate,
};

use crate::render::GraphicsScreen;

// ── Pin / peripheral assignments ────────────────────────────────────────────

assign_resources! {
    pub Resources<'d> {
        display: DisplayResources<'d> {
            dc: GPIO15,
            rst: GPIO7,
            sck: GPIO4,
            cs: GPIO6,
            miso: GPIO16,
            mosi: GPIO5,
            spi: SPI2,
            dma: DMA_CH0,
        },
        backlight: BacklightResources<'d> {
            led: GPIO19,
        },
        buttons: ButtonResources<'d> {
            left: GPIO21,
            right: GPIO2,
            a: GPIO13,
            b: GPIO38,
            start: GPIO12,
            select: GPIO45,
        },
        leds: LedResources<'d> {
            power: GPIO17,
            io: GPIO18,
            rmt: RMT,
        },
        ticker: TickerResources<'d> {
            timg: TIMG1,
        },
    }
}

impl From<esp_hal::peripherals::Peripherals> for Resources<'_> {
    fn from(peripherals: esp_hal::peripherals::Peripherals) -> Self {
        split_resources!(peripherals)
    }
}

// ── Board initialisation ────────────────────────────────────────────────────

/// Step the ESP32-S3 CPU clock through the PLL to `cpu_clock_speed`.
fn set_cpu_clock(cpu_clock_speed: CpuClock) {
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .sysclk_conf()
        .modify(|_, w| unsafe { w.soc_clk_sel().bits(1) });
    let _ = esp_hal::peripherals::SYSTEM::regs()
        .cpu_per_conf()
        .modify(|_, w| unsafe {
            let _ = w.pll_freq_sel().set_bit();
            w.cpuperiod_sel().bits(match cpu_clock_speed {
                CpuClock::_80MHz => 0,
                CpuClock::_160MHz => 1,
                CpuClock::_240MHz => 2,
                _ => panic!("Unsupported CPU clock speed"),
            })
        });

    rom::ets_update_cpu_frequency_rom(cpu_clock_speed.frequency().as_mhz());
}

/// Initialise the badge and hand back the raw peripherals.
///
/// Call once at the top of `main`, then break them up with
/// [`split_resources!`].
#[must_use]
pub fn init() -> esp_hal::peripherals::Peripherals {
    set_cpu_clock(CpuClock::_160MHz);
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    esp_hal::init(config)
}

// ── Display ─────────────────────────────────────────────────────────────────

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>,
    Output<'a>,
>;

/// The badge's 320×170 ST7789 panel.
pub type Display<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

/// The game's [`Screen`](crate::hal::Screen) on the badge.
pub type BadgeScreen = GraphicsScreen<Display<'static>>;

const SPI_BUFFER_LEN: usize = 32000;

/// Bring up the panel over SPI/DMA, switch the backlight on and wrap it as
/// the game screen.
pub fn screen(res: DisplayResources<'static>, backlight: BacklightResources<'static>) -> BadgeScreen {
    let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(SPI_BUFFER_LEN);
    let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
    let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

    let mut delay = esp_hal::delay::Delay::new();

    let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
    let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
    rst.set_high();

    let spi = Spi::new(
        res.spi,
        esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(80)),
    )
    .unwrap()
    .with_sck(res.sck)
    .with_mosi(res.mosi)
    .with_miso(res.miso)
    .with_dma(res.dma)
    .with_buffers(dma_rx_buf, dma_tx_buf)
    .into_async();

    let cs = Output::new(res.cs, Level::High, OutputConfig::default());
    let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

    let buffer = crate::mk_static!([u8; SPI_BUFFER_LEN], [0_u8; SPI_BUFFER_LEN]);
    let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

    let display = mipidsi::Builder::new(mipidsi::models::ST7789, di)
        .reset_pin(rst)
        .display_size(170, 320)
        .invert_colors(mipidsi::options::ColorInversion::Inverted)
        .orientation(mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90))
        .display_offset(35, 0)
        .init(&mut delay)
        .unwrap();

    // The pin has to outlive the game, or the backlight goes dark again.
    let _ = crate::mk_static!(
        Output<'static>,
        Output::new(backlight.led, Level::High, OutputConfig::default())
    );

    info!("display up");
    GraphicsScreen::new(display)
}
