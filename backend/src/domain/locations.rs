//! State and city reference data offered by the console's location pickers.
//!
//! The catalogue is informational: profile writes do not reject values that
//! are missing from it.

/// Cities offered for one state or union territory.
#[derive(Debug, Clone, Copy)]
pub struct StateCities {
    /// State or union territory name.
    pub state: &'static str,
    /// Cities offered for the state.
    pub cities: &'static [&'static str],
}

/// Location catalogue in display order.
pub static LOCATIONS: &[StateCities] = &[
    StateCities {
        state: "Andhra Pradesh",
        cities: &["Visakhapatnam", "Vijayawada", "Guntur", "Nellore", "Kurnool"],
    },
    StateCities {
        state: "Arunachal Pradesh",
        cities: &["Itanagar", "Tawang", "Pasighat", "Ziro"],
    },
    StateCities {
        state: "Assam",
        cities: &["Guwahati", "Silchar", "Dibrugarh", "Jorhat", "Tezpur"],
    },
    StateCities {
        state: "Bihar",
        cities: &["Patna", "Gaya", "Bhagalpur", "Muzaffarpur", "Purnia"],
    },
    StateCities {
        state: "Chhattisgarh",
        cities: &["Raipur", "Bhilai", "Bilaspur", "Korba", "Durg"],
    },
    StateCities {
        state: "Goa",
        cities: &["Panaji", "Margao", "Vasco da Gama", "Mapusa"],
    },
    StateCities {
        state: "Gujarat",
        cities: &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar"],
    },
    StateCities {
        state: "Haryana",
        cities: &["Faridabad", "Gurugram", "Panipat", "Ambala", "Yamunanagar"],
    },
    StateCities {
        state: "Himachal Pradesh",
        cities: &["Shimla", "Dharamshala", "Manali", "Solan", "Mandi"],
    },
    StateCities {
        state: "Jharkhand",
        cities: &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro", "Deoghar"],
    },
    StateCities {
        state: "Karnataka",
        cities: &["Bengaluru", "Mysuru", "Hubballi", "Mangaluru", "Belagavi"],
    },
    StateCities {
        state: "Kerala",
        cities: &["Thiruvananthapuram", "Kochi", "Kozhikode", "Thrissur", "Kollam"],
    },
    StateCities {
        state: "Madhya Pradesh",
        cities: &["Bhopal", "Indore", "Jabalpur", "Gwalior", "Ujjain"],
    },
    StateCities {
        state: "Maharashtra",
        cities: &["Mumbai", "Pune", "Nagpur", "Nashik", "Aurangabad", "Thane"],
    },
    StateCities {
        state: "Manipur",
        cities: &["Imphal", "Thoubal", "Bishnupur", "Churachandpur"],
    },
    StateCities {
        state: "Meghalaya",
        cities: &["Shillong", "Tura", "Jowai", "Nongstoin"],
    },
    StateCities {
        state: "Mizoram",
        cities: &["Aizawl", "Lunglei", "Champhai", "Serchhip"],
    },
    StateCities {
        state: "Nagaland",
        cities: &["Kohima", "Dimapur", "Mokokchung", "Tuensang"],
    },
    StateCities {
        state: "Odisha",
        cities: &["Bhubaneswar", "Cuttack", "Rourkela", "Berhampur", "Sambalpur"],
    },
    StateCities {
        state: "Punjab",
        cities: &["Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda"],
    },
    StateCities {
        state: "Rajasthan",
        cities: &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Bikaner"],
    },
    StateCities {
        state: "Sikkim",
        cities: &["Gangtok", "Namchi", "Geyzing", "Mangan"],
    },
    StateCities {
        state: "Tamil Nadu",
        cities: &["Chennai", "Coimbatore", "Madurai", "Tiruchirappalli", "Salem"],
    },
    StateCities {
        state: "Telangana",
        cities: &["Hyderabad", "Warangal", "Nizamabad", "Karimnagar", "Khammam"],
    },
    StateCities {
        state: "Tripura",
        cities: &["Agartala", "Udaipur", "Dharmanagar", "Kailasahar"],
    },
    StateCities {
        state: "Uttar Pradesh",
        cities: &["Lucknow", "Kanpur", "Ghaziabad", "Agra", "Varanasi", "Noida"],
    },
    StateCities {
        state: "Uttarakhand",
        cities: &["Dehradun", "Haridwar", "Roorkee", "Haldwani", "Rishikesh"],
    },
    StateCities {
        state: "West Bengal",
        cities: &["Kolkata", "Howrah", "Durgapur", "Asansol", "Siliguri"],
    },
    StateCities {
        state: "Delhi",
        cities: &["New Delhi", "North Delhi", "South Delhi", "East Delhi", "West Delhi"],
    },
];

/// Cities offered for `state`, or `None` for an unknown state.
#[must_use]
pub fn cities_for(state: &str) -> Option<&'static [&'static str]> {
    LOCATIONS
        .iter()
        .find(|entry| entry.state == state)
        .map(|entry| entry.cities)
}
