//! Structured, typed view of the effective configuration.
//!
//! [`Settings`] is a snapshot: it is resolved once from an [`OptionSource`]
//! and does not follow later `set` or `reload` calls on the store. Each field
//! is resolved on its own. A wrong-shaped value for one option logs a
//! warning and falls back to that option's default without affecting any
//! other field.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;
use viaconf_core::UnsupportedOptions;

use super::error::ConfigError;
use super::options::OptionSource;
use super::platform::PlatformConfig;

/// Every option the plugin reads, with its declared default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub check_for_updates: bool,
    pub prevent_collision: bool,
    /// Only honoured when `prevent_collision` is on.
    pub auto_team: bool,
    pub new_effect_indicator: bool,
    pub show_new_death_messages: bool,
    pub suppress_metadata_errors: bool,
    pub shield_blocking: bool,
    pub hologram_patch: bool,
    pub piston_animation_patch: bool,
    pub bossbar_patch: bool,
    pub bossbar_anti_flicker: bool,
    pub hologram_y_offset: f64,

    // Packet rate limiting.
    pub max_pps: i32,
    pub max_pps_kick_message: String,
    pub tracking_period: i32,
    pub warning_pps: i32,
    pub max_warnings: i32,
    pub max_warnings_kick_message: String,

    pub send_supported_versions: bool,
    pub simulate_player_tick: bool,
    pub item_cache: bool,
    pub nms_player_ticking: bool,
    pub anti_xray_patch: bool,
    pub quick_move_action_fix: bool,
    pub replace_pistons: bool,
    pub piston_replacement_id: i32,
    pub force_json_transform: bool,
    pub chat_nbt_fix: bool,
    pub blocked_protocols: Vec<i32>,
    pub blocked_disconnect_message: String,
    pub reload_disconnect_message: String,
    pub minimize_cooldown: bool,
    pub team_colour_fix: bool,
    pub suppress_conversion_errors: bool,
    pub disable_auto_complete: bool,
    pub serverside_block_connections: bool,
    pub block_connection_method: String,
    pub reduce_block_storage_memory: bool,
    pub flower_stem_when_block_above: bool,
    pub vine_climb_fix: bool,
    pub snow_collision_fix: bool,
    pub infested_blocks_fix: bool,
    pub tab_complete_delay: i32,
    pub truncate_books: bool,
    pub left_handed_handling: bool,
    pub hitbox_fix_1_9: bool,
    pub hitbox_fix_1_14: bool,
    pub non_full_block_light_fix: bool,
    pub health_nan_fix: bool,
    pub instant_respawn: bool,

    // Proxy backends. Empty on non-proxy platforms.
    pub server_protocols: BTreeMap<String, i32>,
    /// Seconds between backend pings, `-1` when disabled.
    pub ping_interval: i32,
    pub ping_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_for_updates: true,
            prevent_collision: true,
            auto_team: true,
            new_effect_indicator: true,
            show_new_death_messages: true,
            suppress_metadata_errors: false,
            shield_blocking: true,
            hologram_patch: false,
            piston_animation_patch: false,
            bossbar_patch: true,
            bossbar_anti_flicker: false,
            hologram_y_offset: -0.96,
            max_pps: 800,
            max_pps_kick_message: "Sending packets too fast? lag?".to_string(),
            tracking_period: 6,
            warning_pps: 120,
            max_warnings: 3,
            max_warnings_kick_message: "You are sending too many packets, :(".to_string(),
            send_supported_versions: false,
            simulate_player_tick: true,
            item_cache: false,
            nms_player_ticking: false,
            anti_xray_patch: false,
            quick_move_action_fix: false,
            replace_pistons: false,
            piston_replacement_id: 0,
            force_json_transform: false,
            chat_nbt_fix: true,
            blocked_protocols: Vec::new(),
            blocked_disconnect_message: "You are using an unsupported Minecraft version!"
                .to_string(),
            reload_disconnect_message: "Server reload, please rejoin!".to_string(),
            minimize_cooldown: true,
            team_colour_fix: true,
            suppress_conversion_errors: false,
            disable_auto_complete: false,
            serverside_block_connections: false,
            block_connection_method: "packet".to_string(),
            reduce_block_storage_memory: false,
            flower_stem_when_block_above: false,
            vine_climb_fix: false,
            snow_collision_fix: false,
            infested_blocks_fix: true,
            tab_complete_delay: 0,
            truncate_books: false,
            left_handed_handling: true,
            hitbox_fix_1_9: false,
            hitbox_fix_1_14: false,
            non_full_block_light_fix: true,
            health_nan_fix: true,
            instant_respawn: false,
            server_protocols: BTreeMap::new(),
            ping_interval: 60,
            ping_save: true,
        }
    }
}

impl Settings {
    /// Resolves every field from `source`.
    ///
    /// Options listed as unsupported by `platform` are not read at all and
    /// keep their default.
    pub fn from_store<S: OptionSource>(source: &S, platform: &dyn PlatformConfig) -> Self {
        let d = Self::default();
        let r = Resolver {
            source,
            unsupported: platform.unsupported_options(),
        };

        let prevent_collision = r.read("prevent-collision", d.prevent_collision, S::get_bool);
        let auto_team = prevent_collision && r.read("auto-team", d.auto_team, S::get_bool);

        let (server_protocols, ping_interval, ping_save) = match platform.proxy_keys() {
            Some(keys) => (
                r.read(keys.servers, d.server_protocols.clone(), S::get),
                r.read(keys.ping_interval, d.ping_interval, S::get_int),
                r.read(keys.ping_save, d.ping_save, S::get_bool),
            ),
            None => (d.server_protocols.clone(), d.ping_interval, d.ping_save),
        };

        Self {
            check_for_updates: r.read("checkforupdates", d.check_for_updates, S::get_bool),
            prevent_collision,
            auto_team,
            new_effect_indicator: r.read(
                "use-new-effect-indicator",
                d.new_effect_indicator,
                S::get_bool,
            ),
            show_new_death_messages: r.read(
                "use-new-deathmessages",
                d.show_new_death_messages,
                S::get_bool,
            ),
            suppress_metadata_errors: r.read(
                "suppress-metadata-errors",
                d.suppress_metadata_errors,
                S::get_bool,
            ),
            shield_blocking: r.read("shield-blocking", d.shield_blocking, S::get_bool),
            hologram_patch: r.read("hologram-patch", d.hologram_patch, S::get_bool),
            piston_animation_patch: r.read(
                "piston-animation-patch",
                d.piston_animation_patch,
                S::get_bool,
            ),
            bossbar_patch: r.read("bossbar-patch", d.bossbar_patch, S::get_bool),
            bossbar_anti_flicker: r.read(
                "bossbar-anti-flicker",
                d.bossbar_anti_flicker,
                S::get_bool,
            ),
            hologram_y_offset: r.read("hologram-y", d.hologram_y_offset, S::get_double),
            max_pps: r.read("max-pps", d.max_pps, S::get_int),
            max_pps_kick_message: r.read_string("max-pps-kick-msg", &d.max_pps_kick_message),
            tracking_period: r.read("tracking-period", d.tracking_period, S::get_int),
            warning_pps: r.read("tracking-warning-pps", d.warning_pps, S::get_int),
            max_warnings: r.read("tracking-max-warnings", d.max_warnings, S::get_int),
            max_warnings_kick_message: r.read_string(
                "tracking-max-kick-msg",
                &d.max_warnings_kick_message,
            ),
            send_supported_versions: r.read(
                "send-supported-versions",
                d.send_supported_versions,
                S::get_bool,
            ),
            simulate_player_tick: r.read("simulate-pt", d.simulate_player_tick, S::get_bool),
            item_cache: r.read("item-cache", d.item_cache, S::get_bool),
            nms_player_ticking: r.read("nms-player-ticking", d.nms_player_ticking, S::get_bool),
            anti_xray_patch: r.read("anti-xray-patch", d.anti_xray_patch, S::get_bool),
            quick_move_action_fix: r.read(
                "quick-move-action-fix",
                d.quick_move_action_fix,
                S::get_bool,
            ),
            replace_pistons: r.read("replace-pistons", d.replace_pistons, S::get_bool),
            piston_replacement_id: r.read(
                "replacement-piston-id",
                d.piston_replacement_id,
                S::get_int,
            ),
            force_json_transform: r.read(
                "force-json-transform",
                d.force_json_transform,
                S::get_bool,
            ),
            chat_nbt_fix: r.read("chat-nbt-fix", d.chat_nbt_fix, S::get_bool),
            blocked_protocols: r.read(
                "block-protocols",
                d.blocked_protocols.clone(),
                S::get_int_list,
            ),
            blocked_disconnect_message: r.read_string(
                "block-disconnect-msg",
                &d.blocked_disconnect_message,
            ),
            reload_disconnect_message: r.read_string(
                "reload-disconnect-msg",
                &d.reload_disconnect_message,
            ),
            minimize_cooldown: r.read("minimize-cooldown", d.minimize_cooldown, S::get_bool),
            team_colour_fix: r.read("team-colour-fix", d.team_colour_fix, S::get_bool),
            suppress_conversion_errors: r.read(
                "suppress-1_13-conversion-errors",
                d.suppress_conversion_errors,
                S::get_bool,
            ),
            disable_auto_complete: r.read(
                "disable-1_13-auto-complete",
                d.disable_auto_complete,
                S::get_bool,
            ),
            serverside_block_connections: r.read(
                "serverside-blockconnections",
                d.serverside_block_connections,
                S::get_bool,
            ),
            block_connection_method: r.read_string(
                "blockconnection-method",
                &d.block_connection_method,
            ),
            reduce_block_storage_memory: r.read(
                "reduce-blockstorage-memory",
                d.reduce_block_storage_memory,
                S::get_bool,
            ),
            flower_stem_when_block_above: r.read(
                "flowerstem-when-block-above",
                d.flower_stem_when_block_above,
                S::get_bool,
            ),
            vine_climb_fix: r.read("vine-climb-fix", d.vine_climb_fix, S::get_bool),
            snow_collision_fix: r.read("fix-low-snow-collision", d.snow_collision_fix, S::get_bool),
            infested_blocks_fix: r.read(
                "fix-infested-block-breaking",
                d.infested_blocks_fix,
                S::get_bool,
            ),
            tab_complete_delay: r.read("1_13-tab-complete-delay", d.tab_complete_delay, S::get_int),
            truncate_books: r.read("truncate-1_14-books", d.truncate_books, S::get_bool),
            left_handed_handling: r.read(
                "left-handed-handling",
                d.left_handed_handling,
                S::get_bool,
            ),
            hitbox_fix_1_9: r.read("change-1_9-hitbox", d.hitbox_fix_1_9, S::get_bool),
            hitbox_fix_1_14: r.read("change-1_14-hitbox", d.hitbox_fix_1_14, S::get_bool),
            non_full_block_light_fix: r.read(
                "fix-non-full-blocklight",
                d.non_full_block_light_fix,
                S::get_bool,
            ),
            health_nan_fix: r.read("fix-1_14-health-nan", d.health_nan_fix, S::get_bool),
            instant_respawn: r.read("use-1_15-instant-respawn", d.instant_respawn, S::get_bool),
            server_protocols,
            ping_interval,
            ping_save,
        }
    }
}

struct Resolver<'a, S> {
    source: &'a S,
    unsupported: UnsupportedOptions,
}

impl<S: OptionSource> Resolver<'_, S> {
    fn read<T: Clone>(
        &self,
        key: &str,
        default: T,
        accessor: impl FnOnce(&S, &str, T) -> Result<T, ConfigError>,
    ) -> T {
        if self.unsupported.contains(key) {
            return default;
        }
        match accessor(self.source, key, default.clone()) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "falling back to default");
                default
            }
        }
    }

    fn read_string(&self, key: &str, default: &str) -> String {
        self.read(key, default.to_string(), |s, k, d| s.get_string(k, &d))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
